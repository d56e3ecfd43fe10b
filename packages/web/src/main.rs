use dioxus::prelude::*;

use store::ConsoleConfig;
use ui::{ConsoleProvider, NoticeTray};
use views::{Contracts, ContractsKanban, Home, Leads, Login, Shell, Users};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/leads")]
        Leads {},
        #[route("/contracts")]
        Contracts {},
        #[route("/contracts-kanban")]
        ContractsKanban {},
        #[route("/users")]
        Users {},
    #[end_layout]
    #[route("/login")]
    Login {},
}

/// Built into the bundle; the browser has no filesystem to read it from.
const CONSOLE_TOML: &str = include_str!("../console.toml");

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

fn load_config() -> ConsoleConfig {
    match ConsoleConfig::from_toml(CONSOLE_TOML) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                "{} does not parse, using defaults: {e}",
                ConsoleConfig::filename()
            );
            ConsoleConfig::default()
        }
    }
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        document::Link { rel: "stylesheet", href: ui::CONSOLE_CSS }

        ConsoleProvider {
            config,
            NoticeTray {}
            Router::<Route> {}
        }
    }
}
