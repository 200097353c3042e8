//! Coupons is a microservice core responsible for coupon and discount
//! validation, redemption and AI discount authorization for a multi-tenant
//! sales platform. It governs two discount domains: platform subscription
//! coupons and merchant e-commerce coupons.
//!
//! The layered structure of the app is
//!
//! `Application -> Service -> Repo + PostgreSQL`
//!
//! The transport layer is not part of this crate: a host application embeds
//! the `Service` and calls its operations directly. Each layer can throw
//! Error with context or cover occurred error with Error in the context.
//! Business rejections (an expired coupon, an unauthorized AI request) are
//! not errors: they are values returned to the caller with an explicit code.

#![allow(proc_macro_derive_resolution_fallback)]
#![recursion_limit = "128"]
extern crate config as config_crate;
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate failure;
extern crate futures;
extern crate futures_cpupool;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate r2d2;
extern crate regex;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate tokio_core;
extern crate uuid;
extern crate validator;
#[macro_use]
extern crate validator_derive;

#[macro_use]
pub mod macros;
pub mod config;
pub mod errors;
pub mod models;
pub mod repos;
pub mod schema;
pub mod services;

use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use futures_cpupool::CpuPool;

use config::Config;
use repos::repo_factory::ReposFactoryImpl;
use services::StaticContext;

/// Builds the shared service context from provided `Config`: a Postgres
/// connection pool, a CPU pool for blocking repo work and the repo factory.
pub fn create_static_context(config: &Config) -> StaticContext<PgConnection, ConnectionManager<PgConnection>, ReposFactoryImpl> {
    let database_url: String = config
        .server
        .database
        .parse()
        .expect("Database URL must be set in configuration");
    let db_manager = ConnectionManager::<PgConnection>::new(database_url);
    let db_pool = r2d2::Pool::builder()
        .build(db_manager)
        .expect("Failed to create DB connection pool");

    let thread_count = config.server.thread_count;
    let cpu_pool = CpuPool::new(thread_count);

    info!("Coupon engine context created, threads: {}", thread_count);

    StaticContext::new(db_pool, cpu_pool, ReposFactoryImpl::default())
}
