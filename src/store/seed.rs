use std::sync::Arc;

use anyhow::{Context, Result};

use super::{NewCollection, NewPrompt, Store};

/// First-run sample data: two collections with a few ordered prompts each.
/// Skipped entirely once any collection exists.
pub async fn seed_initial_data(store: &Arc<dyn Store>) -> Result<()> {
    if store.is_seeded().await.context("failed to check for existing data")? {
        tracing::debug!("data already exists, skipping seed");
        return Ok(());
    }

    let research = store
        .create_collection(NewCollection {
            title: "Deep Research 2.0".to_string(),
            description: Some("Advanced research prompts for comprehensive analysis".to_string()),
        })
        .await
        .context("failed to seed research collection")?;

    let research_prompts = [
        "If you had a hundred million dollars to invest in solving one global problem, \
         what would it be and how would you approach it? Provide a detailed analysis \
         including potential challenges, measurable outcomes, and timeline.",
        "Research this topic thoroughly and provide comprehensive insights with multiple \
         perspectives, citing reliable sources and potential counterarguments.",
        "Analyze this from three different expert perspectives: technical, business, and \
         social impact. For each perspective, provide specific recommendations and \
         potential risks.",
    ];
    for content in research_prompts {
        store
            .create_prompt(NewPrompt {
                content: content.to_string(),
                collection_id: research.id,
                order: None,
            })
            .await
            .context("failed to seed research prompt")?;
    }

    let writing = store
        .create_collection(NewCollection {
            title: "Creative Writing".to_string(),
            description: Some("Prompts for creative content generation".to_string()),
        })
        .await
        .context("failed to seed writing collection")?;

    let writing_prompts = [
        "Write a compelling story that begins with: 'The last thing I expected to find \
         in my grandmother's attic was...' Make it engaging and emotionally resonant.",
        "Create a detailed character profile for a protagonist whose unusual hobby \
         becomes crucial to solving a major problem. Include backstory, motivations, \
         and character arc.",
    ];
    for content in writing_prompts {
        store
            .create_prompt(NewPrompt {
                content: content.to_string(),
                collection_id: writing.id,
                order: None,
            })
            .await
            .context("failed to seed writing prompt")?;
    }

    tracing::info!("seeded initial collections and prompts");
    Ok(())
}
