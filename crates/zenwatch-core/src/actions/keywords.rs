//! Personalization keywords.

use zenwatch_api::types::{ContentKind, NewUserKeyword, UserKeyword};

use super::temp_id;
use crate::cache::keys;
use crate::error::Result;
use crate::mutation::{MutationPlan, run_optimistic};
use crate::validation::validate_user_keyword;
use crate::zenwatch::ZenWatch;

impl ZenWatch {
    /// Adds a keyword. It shows up in the list immediately under a
    /// temporary id that is swapped for the server's once confirmed.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or the request error after rolling back.
    pub async fn add_keyword(&self, keyword: NewUserKeyword) -> Result<UserKeyword> {
        let keyword = NewUserKeyword {
            keyword: keyword.keyword.trim().to_string(),
            weight: keyword.weight,
        };
        validate_user_keyword(&keyword)?;

        let placeholder = UserKeyword {
            id: temp_id(),
            keyword: keyword.keyword.clone(),
            weight: keyword.weight,
            created_at: None,
        };
        let temp = placeholder.id;
        let plan = MutationPlan::new("add_keyword")
            .affects(keys::my_keywords())
            .invalidates(keys::feed(ContentKind::Article))
            .on_success(format!("Added \"{}\"", keyword.keyword))
            .on_error("Could not add keyword");

        let created = run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                cache.update::<Vec<UserKeyword>>(&keys::my_keywords(), |list| {
                    list.push(placeholder);
                });
            },
            self.api.add_keyword(&keyword),
        )
        .await?;

        self.cache.update::<Vec<UserKeyword>>(&keys::my_keywords(), |list| {
            if let Some(entry) = list.iter_mut().find(|k| k.id == temp) {
                *entry = created.clone();
            }
        });
        Ok(created)
    }

    /// Removes a keyword.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn remove_keyword(&self, id: i64) -> Result<()> {
        let plan = MutationPlan::new("remove_keyword")
            .affects(keys::my_keywords())
            .invalidates(keys::feed(ContentKind::Article))
            .on_success("Keyword removed")
            .on_error("Could not remove keyword");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                cache.update::<Vec<UserKeyword>>(&keys::my_keywords(), |list| {
                    list.retain(|k| k.id != id);
                });
            },
            self.api.remove_keyword(id),
        )
        .await
    }
}
