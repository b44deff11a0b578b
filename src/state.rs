use crate::{
    client::StudentQueries,
    config::{RuntimeConfiguration, StoreBackend},
    error::StudentsResult,
    service::StudentService,
    store::{StudentStore, memory::InMemoryStudentStore, postgres::PgStudentStore},
};
use maud::{DOCTYPE, Markup, html};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct StudentsState {
    service: StudentService,
    queries: StudentQueries,
    config: RuntimeConfiguration,
}

impl StudentsState {
    pub async fn new(config: RuntimeConfiguration) -> StudentsResult<Self> {
        let server_config = config.server_config();

        let store: Arc<dyn StudentStore> = match (server_config.store_backend, config.db_config())
        {
            (StoreBackend::Postgres, Some(db_config)) => {
                let options = PgPoolOptions::new().max_connections(server_config.max_connections);
                Arc::new(PgStudentStore::new(options, &db_config.get_db_path()).await?)
            }
            (StoreBackend::Postgres, None) | (StoreBackend::Memory, _) => {
                warn!("using an in-memory student store, nothing will be persisted");
                Arc::new(InMemoryStudentStore::new())
            }
        };

        Ok(Self::with_store(store, config))
    }

    pub fn with_store(store: Arc<dyn StudentStore>, config: RuntimeConfiguration) -> Self {
        let queries = StudentQueries::new(&config.server_config().api_base_url);

        Self {
            service: StudentService::new(store),
            queries,
            config,
        }
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Student Management" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center justify-center text-white" {
                    div id="toasts" class="fixed bottom-4 right-4 flex flex-col space-y-2" {}
                    (markup)
                }
            }
        }
    }

    pub const fn service(&self) -> &StudentService {
        &self.service
    }

    pub const fn queries(&self) -> &StudentQueries {
        &self.queries
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    pub async fn sensible_shutdown(&self) {
        self.service.close().await;
    }
}
