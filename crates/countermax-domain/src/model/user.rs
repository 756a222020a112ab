//! Field operators (사용자)

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lenient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserRole {
    #[default]
    Operator,
    Admin,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Operator => "일반사용자",
            UserRole::Admin => "관리자",
        }
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::string(deserializer)?;
        Ok(match raw.trim() {
            "관리자" => UserRole::Admin,
            _ => UserRole::Operator,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
}

impl UserStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Active => "사용",
            UserStatus::Suspended => "정지",
        }
    }
}

impl Serialize for UserStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::string(deserializer)?;
        Ok(match raw.trim() {
            "정지" => UserStatus::Suspended,
            _ => UserStatus::Active,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "번호", default, deserialize_with = "lenient::u32_or_zero")]
    pub number: u32,
    #[serde(rename = "이름", default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Login id, also the USER_ID of task files
    #[serde(rename = "아이디", default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(rename = "비밀번호", default, deserialize_with = "lenient::string")]
    pub password: String,
    #[serde(rename = "권한", default)]
    pub role: UserRole,
    #[serde(
        rename = "등록일자",
        default,
        deserialize_with = "lenient::optional_date",
        serialize_with = "lenient::serialize_optional_date"
    )]
    pub reg_date: Option<NaiveDate>,
    #[serde(rename = "상태", default)]
    pub status: UserStatus,
    #[serde(
        rename = "시작일",
        default,
        deserialize_with = "lenient::optional_date",
        serialize_with = "lenient::serialize_optional_date"
    )]
    pub start: Option<NaiveDate>,
    #[serde(
        rename = "종료일",
        default,
        deserialize_with = "lenient::optional_date",
        serialize_with = "lenient::serialize_optional_date"
    )]
    pub end: Option<NaiveDate>,
    #[serde(rename = "부가정보", default, deserialize_with = "lenient::string")]
    pub extra: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: 0,
            name: name.into(),
            id: id.into(),
            password: String::new(),
            role: UserRole::Operator,
            reg_date: None,
            status: UserStatus::Active,
            start: None,
            end: None,
            extra: String::new(),
        }
    }
}
