//! Domain types for the ticket shop.
//!
//! These types represent validated domain objects separate from database row types.

pub mod event;
pub mod shop;

pub use event::{Event, EventFilter, EventSummary};
pub use shop::{Consumable, Reservation, Shoppable, Ticket, TicketRecord};
