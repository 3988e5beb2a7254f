//! Contact form message model

use serde::{Deserialize, Serialize};

/// A stored contact-form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub sno: i64,
    pub name: String,
    pub email: String,
    pub phone_num: String,
    pub msg: String,
    /// Submission timestamp
    pub date: String,
}

/// Fields submitted by the contact form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub msg: String,
}

impl NewContactMessage {
    /// Attach the submission timestamp
    pub fn into_message(self, date: String) -> ContactMessage {
        ContactMessage {
            sno: 0,
            name: self.name,
            email: self.email,
            phone_num: self.phone,
            msg: self.msg,
            date,
        }
    }
}
