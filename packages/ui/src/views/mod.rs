mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod record_form;
pub use record_form::{FieldControl, RecordForm};

mod record_table;
pub use record_table::{RecordTable, TableRow};

mod crud_screen;
pub use crud_screen::crud_screen;

mod tables;
pub use tables::{ContractsView, LeadsView, UsersView};

mod kanban_board;
pub use kanban_board::{ContractDrawer, ContractsKanbanView};

mod login_view;
pub use login_view::LoginView;

mod welcome;
pub use welcome::Welcome;
