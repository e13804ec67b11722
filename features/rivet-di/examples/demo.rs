//! Boots a small container and prints what it wired together.

use std::{collections::HashMap, sync::Arc};

use rivet_di::{Blueprint, ContainerBuilder, DynError, Late, PropertySource};

struct ConnectionPool {
    url: Late<String>,
}

struct OrderRepository {
    pool: Arc<ConnectionPool>,
}

struct OrderService {
    repository: Arc<OrderRepository>,
}

struct Env(HashMap<String, String>);

impl PropertySource for Env {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

fn main() -> Result<(), DynError> {
    let properties = Env(HashMap::from([(
        "database.url".to_string(),
        "postgres://localhost/orders".to_string(),
    )]));

    let container = ContainerBuilder::new()
        .add_blueprint(
            Blueprint::component::<ConnectionPool>("pool")
                .constructor(&[], |_| Ok(ConnectionPool { url: Late::unset() }))
                .value_keyed(
                    "database.url",
                    "url",
                    |pool: &ConnectionPool, value: String| pool.url.fill(value).map_err(Into::into),
                )
                .build()?,
        )
        .add_blueprint(
            Blueprint::component::<OrderRepository>("repository")
                .constructor(&["pool"], |args| {
                    Ok(OrderRepository {
                        pool: args.get::<ConnectionPool>(0)?,
                    })
                })
                .build()?,
        )
        .add_blueprint(
            Blueprint::component::<OrderService>("service")
                .constructor(&["repository"], |args| {
                    Ok(OrderService {
                        repository: args.get::<OrderRepository>(0)?,
                    })
                })
                .build()?,
        )
        .with_property_source(properties)
        .build()?;

    println!("{container:?}");

    let service = container.get_by_type::<OrderService>()?;
    println!("service talks to {}", service.repository.pool.url.get());

    Ok(())
}
