//! Users and permission levels.

use crate::store::{Audit, Patch, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission level, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UserLevel {
    Viewer = 1,
    Assistant = 2,
    Accountant = 3,
    Analyst = 4,
    Administrator = 5,
    Developer = 6,
}

impl UserLevel {
    /// Numeric rank used for menu visibility checks.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    pub user_level: UserLevel,
    pub enabled: bool,
    /// Names of the branches this user works for.
    #[serde(default)]
    pub assigned_branches: Vec<String>,
    #[serde(default)]
    pub position: String,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(default)]
    pub is_deleted: bool,
}

impl User {
    /// Nickname when set, otherwise first and last name.
    pub fn display_name(&self) -> String {
        match &self.nickname {
            Some(nick) if !nick.is_empty() => nick.clone(),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

impl Record for User {
    type Key = String;
    const KIND: &'static str = "User";

    fn key(&self) -> String {
        self.username.clone()
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub user_level: Option<UserLevel>,
    pub enabled: Option<bool>,
    pub assigned_branches: Option<Vec<String>>,
    pub position: Option<String>,
}

impl Patch<User> for UserPatch {
    fn apply(self, target: &mut User) {
        if let Some(v) = self.username {
            target.username = v;
        }
        if let Some(v) = self.first_name {
            target.first_name = v;
        }
        if let Some(v) = self.last_name {
            target.last_name = v;
        }
        if self.nickname.is_some() {
            target.nickname = self.nickname;
        }
        if let Some(v) = self.email {
            target.email = v;
        }
        if self.date_of_birth.is_some() {
            target.date_of_birth = self.date_of_birth;
        }
        if let Some(v) = self.user_level {
            target.user_level = v;
        }
        if let Some(v) = self.enabled {
            target.enabled = v;
        }
        if let Some(v) = self.assigned_branches {
            target.assigned_branches = v;
        }
        if let Some(v) = self.position {
            target.position = v;
        }
    }
}
