use crate::domain::model::{Occupant, Resident};

pub const NAME_PLACEHOLDER: &str = "{name}";
pub const DEFAULT_TEMPLATE: &str = "Olá {name}, você tem uma entrega aguardando na portaria";

/// Notification text parameterized by the occupant's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    template: String,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl MessageTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn render(&self, name: &str) -> String {
        self.template.replace(NAME_PLACEHOLDER, name)
    }
}

/// Only the first registered occupant is notified.
pub fn select_recipient(resident: &Resident) -> Option<&Occupant> {
    resident.occupants.first()
}
