//! Drive-like response types shared by the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use fieldmask::Selectable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Selectable)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    pub etag: Option<String>,
    pub next_page_token: Option<String>,
    pub items: Vec<File>,
    #[serde(skip)]
    pub kind: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Selectable)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: String,
    pub title: String,
    pub mime_type: Option<String>,
    pub modified_date: Option<DateTime<Utc>>,
    pub labels: Option<Labels>,
    pub owners: Vec<User>,
    pub parents: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Selectable)]
pub struct Labels {
    pub starred: bool,
    pub trashed: bool,
}

#[derive(Debug, Default, Serialize, Deserialize, Selectable)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "displayName")]
    pub name: String,
    pub email_address: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Selectable)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub title: String,
    pub sub_folders: Vec<Folder>,
}

#[derive(Debug, Default, Serialize, Deserialize, Selectable)]
#[serde(rename_all = "camelCase")]
pub struct ItemList<T> {
    pub next_page_token: Option<String>,
    pub items: Vec<T>,
}

pub fn sample_file() -> File {
    File {
        id: "0B1".to_string(),
        title: "notes.txt".to_string(),
        mime_type: Some("text/plain".to_string()),
        modified_date: None,
        labels: Some(Labels {
            starred: true,
            trashed: false,
        }),
        owners: vec![User {
            name: "Ada".to_string(),
            email_address: Some("ada@example.com".to_string()),
        }],
        parents: vec!["root".to_string()],
    }
}
