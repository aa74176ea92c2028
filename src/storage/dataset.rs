//! CSV Dataset
//!
//! Loads `users.csv`, `posts.csv` and `interactions.csv` from one directory.
//! Columns are matched by header name. The optional `type` column of
//! `interactions.csv` is kept; other extra columns are ignored.

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::audit::AuditRequest;
use crate::constants::files;
use crate::types::{AuditError, Interaction, Post, Result, UserProfile};

/// In-memory copy of the platform data
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    users: Vec<UserProfile>,
    posts: Vec<Post>,
    interactions: Vec<Interaction>,
}

impl Dataset {
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(AuditError::Data(format!(
                "Data directory not found: {}",
                dir.display()
            )));
        }

        let dataset = Self::from_records(
            read_records(&dir.join(files::USERS_CSV))?,
            read_records(&dir.join(files::POSTS_CSV))?,
            read_records(&dir.join(files::INTERACTIONS_CSV))?,
        );

        info!(
            "Loaded {} users, {} posts, {} interactions from {}",
            dataset.users.len(),
            dataset.posts.len(),
            dataset.interactions.len(),
            dir.display()
        );
        Ok(dataset)
    }

    pub fn from_records(
        users: Vec<UserProfile>,
        posts: Vec<Post>,
        interactions: Vec<Interaction>,
    ) -> Self {
        let mut seen = HashSet::new();
        for user in &users {
            if !seen.insert(user.user_id.as_str()) {
                warn!("Duplicate user_id {}; the first row wins", user.user_id);
            }
        }

        Self {
            users,
            posts,
            interactions,
        }
    }

    pub fn users(&self) -> &[UserProfile] {
        &self.users
    }

    pub fn user(&self, user_id: &str) -> Result<&UserProfile> {
        self.users
            .iter()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| AuditError::UserNotFound(user_id.to_string()))
    }

    /// Posts owned by `user_id`, in file order
    pub fn posts_for(&self, user_id: &str) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Interactions `user_id` sent or received, in file order
    pub fn interactions_for(&self, user_id: &str) -> Vec<Interaction> {
        self.interactions
            .iter()
            .filter(|i| i.involves(user_id))
            .cloned()
            .collect()
    }

    /// Everything needed to audit `user_id`
    pub fn subject(&self, user_id: &str) -> Result<AuditSubject> {
        let user = self.user(user_id)?.clone();
        let posts = self.posts_for(user_id);
        let interactions = self.interactions_for(user_id);
        debug!(
            "Subject {}: {} posts, {} interactions",
            user_id,
            posts.len(),
            interactions.len()
        );
        Ok(AuditSubject {
            user,
            posts,
            interactions,
        })
    }
}

/// One user's records, owned so a request can borrow them
#[derive(Debug, Clone)]
pub struct AuditSubject {
    pub user: UserProfile,
    pub posts: Vec<Post>,
    pub interactions: Vec<Interaction>,
}

impl AuditSubject {
    pub fn request<'a>(
        &'a self,
        users: &'a [UserProfile],
        policy_text: &'a str,
    ) -> AuditRequest<'a> {
        AuditRequest {
            user: &self.user,
            posts: &self.posts,
            interactions: &self.interactions,
            users,
            policy_text,
        }
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(AuditError::Data(format!("Missing file: {}", path.display())));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)?;

    reader
        .deserialize()
        .enumerate()
        .map(|(idx, row)| {
            // +2: header line and 1-based numbering
            row.map_err(|e| AuditError::Data(format!("{} line {}: {}", display(path), idx + 2, e)))
        })
        .collect()
}

fn display(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
