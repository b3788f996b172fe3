pub mod event;
pub mod profile;
pub mod ticket;
pub mod transaction;

pub use event::Event;
pub use profile::Profile;
pub use ticket::{CatalogEntry, TicketStatus, TicketUnit};
pub use transaction::{NewTransaction, Transaction};
