// Adapters layer: concrete implementations of the domain ports (storage, directory, messaging).

pub mod json_file;
pub mod log_sender;
pub mod memory;
pub mod toml_directory;
pub mod twilio;

pub use json_file::JsonFileDeliveryStore;
pub use log_sender::LogNotificationSender;
pub use memory::{MemoryDeliveryStore, MemoryResidentDirectory};
pub use toml_directory::load_residents_file;
pub use twilio::{TwilioCredentials, TwilioWhatsAppSender};
