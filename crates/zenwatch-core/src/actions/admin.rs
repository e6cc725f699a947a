//! Admin console: scraping keywords and sources.

use zenwatch_api::types::{Keyword, KeywordInput, KeywordUpdate, Source, SourceInput, SourceUpdate};

use crate::cache::keys;
use crate::error::Result;
use crate::mutation::{MutationPlan, run_optimistic};
use crate::validation::{validate_admin_keyword, validate_source};
use crate::zenwatch::ZenWatch;

impl ZenWatch {
    /// Creates a scraping keyword.
    ///
    /// # Errors
    ///
    /// Returns a validation error or the request error.
    pub async fn create_admin_keyword(&self, input: &KeywordInput) -> Result<Keyword> {
        validate_admin_keyword(input)?;
        let plan = MutationPlan::new("create_admin_keyword")
            .affects(keys::admin_keywords())
            .on_success(format!("Keyword \"{}\" created", input.name.trim()))
            .on_error("Could not create keyword");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |_| {},
            self.api.create_admin_keyword(input),
        )
        .await
    }

    /// Enables or disables a scraping keyword.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn set_keyword_active(&self, id: i64, active: bool) -> Result<Keyword> {
        let update = KeywordUpdate {
            is_active: Some(active),
            ..KeywordUpdate::default()
        };
        let plan = MutationPlan::new("set_keyword_active")
            .affects(keys::admin_keywords())
            .on_error("Could not update keyword");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                cache.update::<Vec<Keyword>>(&keys::admin_keywords(), |list| {
                    list.iter_mut()
                        .filter(|k| k.id == id)
                        .for_each(|k| k.is_active = active);
                });
            },
            self.api.update_admin_keyword(id, &update),
        )
        .await
    }

    /// Deletes a scraping keyword.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn delete_admin_keyword(&self, id: i64) -> Result<()> {
        let plan = MutationPlan::new("delete_admin_keyword")
            .affects(keys::admin_keywords())
            .on_success("Keyword deleted")
            .on_error("Could not delete keyword");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                cache.update::<Vec<Keyword>>(&keys::admin_keywords(), |list| {
                    list.retain(|k| k.id != id);
                });
            },
            self.api.delete_admin_keyword(id),
        )
        .await
    }

    /// Creates a scraping source.
    ///
    /// # Errors
    ///
    /// Returns a validation error or the request error.
    pub async fn create_source(&self, input: &SourceInput) -> Result<Source> {
        validate_source(input)?;
        let plan = MutationPlan::new("create_source")
            .affects(keys::sources())
            .on_success(format!("Source \"{}\" created", input.name.trim()))
            .on_error("Could not create source");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |_| {},
            self.api.create_source(input),
        )
        .await
    }

    /// Enables or disables a scraping source.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn set_source_active(&self, id: i64, active: bool) -> Result<Source> {
        let update = SourceUpdate {
            is_active: Some(active),
            ..SourceUpdate::default()
        };
        let plan = MutationPlan::new("set_source_active")
            .affects(keys::sources())
            .on_error("Could not update source");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                cache.update::<Vec<Source>>(&keys::sources(), |list| {
                    list.iter_mut()
                        .filter(|s| s.id == id)
                        .for_each(|s| s.is_active = active);
                });
            },
            self.api.update_source(id, &update),
        )
        .await
    }

    /// Deletes a scraping source.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn delete_source(&self, id: i64) -> Result<()> {
        let plan = MutationPlan::new("delete_source")
            .affects(keys::sources())
            .on_success("Source deleted")
            .on_error("Could not delete source");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                cache.update::<Vec<Source>>(&keys::sources(), |list| {
                    list.retain(|s| s.id != id);
                });
            },
            self.api.delete_source(id),
        )
        .await
    }
}
