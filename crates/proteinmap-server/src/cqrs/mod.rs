pub use mediator::DefaultAsyncMediator;
use proteinmap_common::AminoAcidAlphabet;
use sqlx::PgPool;
use std::sync::Arc;

pub mod middleware;

pub type AppMediator = DefaultAsyncMediator;

pub fn build_mediator(pool: PgPool, alphabet: Arc<AminoAcidAlphabet>) -> AppMediator {
    DefaultAsyncMediator::builder()
        // Proteins
        .add_handler({
            let pool = pool.clone();
            move |cmd| {
                let pool = pool.clone();
                let alphabet = alphabet.clone();
                async move {
                    crate::features::proteins::commands::create::handle(pool, alphabet, cmd).await
                }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |cmd| {
                let pool = pool.clone();
                async move { crate::features::proteins::commands::delete::handle(pool, cmd).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::proteins::queries::get::handle(pool, query).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move {
                    crate::features::proteins::queries::list_by_organism::handle(pool, query).await
                }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::proteins::queries::coverage::handle(pool, query).await }
            }
        })
        // Pfams
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::pfams::queries::get::handle(pool, query).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move {
                    crate::features::pfams::queries::list_by_organism::handle(pool, query).await
                }
            }
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, db};

    #[tokio::test(flavor = "multi_thread")]
    async fn test_mediator_builds() {
        let mut config = Config::default().database;
        config.min_connections = 0;
        let pool = db::create_lazy_pool(&config).unwrap();
        let _mediator = build_mediator(pool, Arc::new(AminoAcidAlphabet::canonical()));
    }
}
