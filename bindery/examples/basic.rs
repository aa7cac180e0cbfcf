//! Basic example of the Bindery binding registry.

use std::sync::Arc;

use bindery::prelude::*;

// === Define your traits and types ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

#[derive(Default)]
struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

impl BindsTo<dyn Logger> for ConsoleLogger {
    fn upcast(this: Arc<Self>) -> Arc<dyn Logger> {
        this
    }
}

struct Database {
    url: String,
    logger: Arc<dyn Logger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

struct Engine {
    label: &'static str,
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("bindery_container=debug")
        .init();

    let context = Context::global();

    // Stage a batch of bindings and merge it in
    let mut builder = AssemblyBuilder::new();
    builder
        // Logger — trait binding, built from the no-argument constructor
        .add_injectable_as::<ConsoleLogger, dyn Logger>(Scope::Singleton)
        // Database — singleton whose factory resolves its own dependencies
        .add_factory(Scope::Singleton, || {
            let logger: Arc<dyn Logger> = Context::global()
                .resolve()
                .expect("logger is registered");
            Arc::new(Database {
                url: "postgres://localhost/myapp".to_string(),
                logger,
            })
        })
        // Two engines under the same type, told apart by name
        .add_named_factory("v1", Scope::Prototype, || Arc::new(Engine { label: "v1" }))
        .add_named_factory("v2", Scope::Prototype, || Arc::new(Engine { label: "v2" }));
    context.register(builder.build());

    // === Resolve ===
    let db: Arc<Database> = context.resolve()?;
    println!("{}", db.query("SELECT * FROM users WHERE id = 42"));

    // Singletons resolve to the identical instance
    let db_again: Arc<Database> = context.resolve()?;
    println!("same database instance: {}", Arc::ptr_eq(&db, &db_again));

    // Named bindings are independent
    let v1: Arc<Engine> = context.resolve_named("v1")?;
    let v2: Arc<Engine> = context.resolve_named("v2")?;
    println!("engines: {} / {}", v1.label, v2.label);

    // Optional-typed call sites land on the unwrapped binding
    let maybe_db: Option<Arc<Database>> = context.resolve_wrapped()?;
    println!("optional resolve found a database: {}", maybe_db.is_some());

    // Non-owning observation: alive because the singleton cache owns it
    let observed = context.weak_resolve::<dyn Logger>()?;
    if let Some(logger) = observed {
        logger.log("observed without taking ownership");
    }

    Ok(())
}
