use anyhow::Context;
use futures::{StreamExt, stream::FuturesUnordered};

use crate::{
    context::InitContext,
    resources::load_model_gltf,
    showcase::{carousel::LoadedFruit, fruit::Fruit},
};

/// Load every fruit's model concurrently and wait for the whole batch.
///
/// Results are collected in completion order, tagged with their catalogue
/// index. The batch is all-or-nothing: once every load has finished, the first
/// failure (if any) is returned and the models that did load are dropped.
pub async fn load_fruits(ctx: &InitContext, fruits: &[Fruit]) -> anyhow::Result<Vec<LoadedFruit>> {
    let loads: FuturesUnordered<_> = fruits
        .iter()
        .map(|fruit| async move {
            log::info!("loading {} from {}", fruit.name, fruit.path);
            let node = load_model_gltf(fruit.path, fruit.index as u32, &ctx.device, &ctx.queue)
                .await
                .with_context(|| format!("failed to load the {} model ({})", fruit.name, fruit.path))?;
            log::info!("{} loaded", fruit.name);
            anyhow::Ok(LoadedFruit {
                index: fruit.index,
                node,
            })
        })
        .collect();
    let results: Vec<anyhow::Result<LoadedFruit>> = loads.collect().await;
    results.into_iter().collect()
}
