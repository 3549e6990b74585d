//! Directory entries.

use serde::{Deserialize, Serialize};

use octopus_core::User;

use super::message::GROUP_PREFIX;

/// Username of the built-in file transfer helper.
pub const FILE_HELPER: &str = "filehelper";

/// A user, friend or group known to the session.
///
/// `id` is stable across logins; `user_name` is only valid for the current
/// session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub id: String,
    pub user_name: String,
    pub nick_name: String,
    pub remark_name: String,
    /// Group-specific display name, only set for group members.
    pub display_name: String,
}

impl Contact {
    /// Returns the file transfer helper contact.
    pub fn file_helper() -> Self {
        Self {
            id: FILE_HELPER.to_string(),
            user_name: FILE_HELPER.to_string(),
            nick_name: "文件传输助手".to_string(),
            ..Default::default()
        }
    }

    /// Returns true for group conversations.
    pub fn is_group(&self) -> bool {
        self.user_name.starts_with(GROUP_PREFIX)
    }

    /// Name shown for a message author: display name, remark, then nickname.
    pub fn remark(&self) -> &str {
        first_non_empty(&[&self.display_name, &self.remark_name, &self.nick_name])
    }

    /// Title of a private chat: remark, nickname, then id.
    pub fn title(&self) -> &str {
        first_non_empty(&[&self.remark_name, &self.nick_name, &self.id])
    }

    /// Title of a group chat: nickname, then id.
    pub fn group_title(&self) -> &str {
        first_non_empty(&[&self.nick_name, &self.id])
    }

    /// Converts the contact into an event author.
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.nick_name.clone(),
            remark: self.remark().to_string(),
        }
    }

    /// Converts the logged-in account into an event author.
    pub fn to_self_user(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.nick_name.clone(),
            remark: self.nick_name.clone(),
        }
    }
}

/// Finds a contact by its stable id.
pub fn find_by_id<'a>(contacts: &'a [Contact], id: &str) -> Option<&'a Contact> {
    contacts.iter().find(|c| c.id == id)
}

/// Finds a contact by its session username.
pub fn find_by_user_name<'a>(contacts: &'a [Contact], user_name: &str) -> Option<&'a Contact> {
    contacts.iter().find(|c| c.user_name == user_name)
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> &'a str {
    candidates.iter().copied().find(|s| !s.is_empty()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str, nick: &str, remark: &str, display: &str) -> Contact {
        Contact {
            id: id.into(),
            user_name: format!("@{id}"),
            nick_name: nick.into(),
            remark_name: remark.into(),
            display_name: display.into(),
        }
    }

    #[test]
    fn test_remark_precedence() {
        assert_eq!(contact("1", "nick", "remark", "display").remark(), "display");
        assert_eq!(contact("1", "nick", "remark", "").remark(), "remark");
        assert_eq!(contact("1", "nick", "", "").remark(), "nick");
    }

    #[test]
    fn test_title_precedence() {
        assert_eq!(contact("1", "nick", "remark", "").title(), "remark");
        assert_eq!(contact("1", "nick", "", "").title(), "nick");
        assert_eq!(contact("1", "", "", "").title(), "1");
        assert_eq!(contact("1", "", "remark", "").group_title(), "1");
    }

    #[test]
    fn test_lookup() {
        let contacts = vec![contact("1", "a", "", ""), contact("2", "b", "", "")];
        assert_eq!(find_by_id(&contacts, "2").unwrap().nick_name, "b");
        assert_eq!(find_by_user_name(&contacts, "@1").unwrap().id, "1");
        assert!(find_by_id(&contacts, "3").is_none());
    }
}
