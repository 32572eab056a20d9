use log::{error, info};
use std::sync::Arc;

use super::ModelResolver;
use crate::context::RequestContext;
use crate::error::ImportError;
use crate::model::{Instruction, Recipe, SourceType};
use crate::pdf_to_text::extract_text_blocking;
use crate::store::FileStore;
use crate::url_to_text::fetchers::RequestFetcher;
use crate::url_to_text::html::ContentParser;

/// Imports recipes from web pages, PDFs and free text.
///
/// Every call resolves the caller's model first, then fetches or extracts the
/// content and hands it to the model. Nothing is retried and nothing is
/// persisted; the caller stores the returned recipe.
pub struct RecipeImportService {
    fetcher: RequestFetcher,
    parser: ContentParser,
    models: Arc<ModelResolver>,
    files: Arc<dyn FileStore>,
}

impl RecipeImportService {
    pub fn new(
        fetcher: RequestFetcher,
        parser: ContentParser,
        models: Arc<ModelResolver>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            fetcher,
            parser,
            models,
            files,
        }
    }

    pub async fn import_from_url(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        url: &str,
    ) -> Result<Recipe, ImportError> {
        let result = self.try_import_from_url(ctx, user_id, url).await;
        if let Err(e) = &result {
            error!("Import from {} failed: {}", url, e);
        }
        result
    }

    async fn try_import_from_url(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        url: &str,
    ) -> Result<Recipe, ImportError> {
        let provider = self.models.resolve(ctx, user_id).await?;

        let html = self
            .fetcher
            .fetch(ctx, url)
            .await
            .map_err(|e| ImportError::fetch(url, e))?;
        let content = self
            .parser
            .parse(&html)
            .map_err(|e| ImportError::parse(url, e))?;
        ctx.check()?;

        let mut recipe = provider.parse(ctx, &content, "webpage").await?;
        recipe.user_id = user_id.to_string();
        recipe.source = Some(url.to_string());
        recipe.source_type = SourceType::Url;

        info!(
            "Imported '{}' from {} using {}",
            recipe.title,
            url,
            provider.model()
        );
        Ok(recipe)
    }

    pub async fn import_from_pdf(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        pdf_data: Vec<u8>,
    ) -> Result<Recipe, ImportError> {
        let result = self.try_import_from_pdf(ctx, user_id, pdf_data).await;
        if let Err(e) = &result {
            error!("PDF import for user {} failed: {}", user_id, e);
        }
        result
    }

    async fn try_import_from_pdf(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        pdf_data: Vec<u8>,
    ) -> Result<Recipe, ImportError> {
        let provider = self.models.resolve(ctx, user_id).await?;

        let text = ctx.run(extract_text_blocking(pdf_data)).await??;

        let mut recipe = provider.parse(ctx, &text, "PDF").await?;
        recipe.user_id = user_id.to_string();
        recipe.source_type = SourceType::Pdf;

        info!(
            "Imported '{}' from PDF using {}",
            recipe.title,
            provider.model()
        );
        Ok(recipe)
    }

    /// Split free text into numbered steps.
    pub async fn parse_instructions(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        text: &str,
    ) -> Result<Vec<Instruction>, ImportError> {
        let provider = self.models.resolve(ctx, user_id).await?;
        provider
            .parse_instructions(ctx, text)
            .await
            .map_err(|e| {
                error!("Instruction parsing for user {} failed: {}", user_id, e);
                e.into()
            })
    }

    /// Upload an image and point the recipe at it.
    pub async fn attach_image(
        &self,
        ctx: &RequestContext,
        recipe: &mut Recipe,
        image: &[u8],
    ) -> Result<(), ImportError> {
        let url = ctx.run(self.files.upload_file(image)).await??;
        recipe.image_url = Some(url);
        Ok(())
    }
}
