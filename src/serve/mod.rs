//! HTTP API and live preview server.

mod error;
mod images;
mod projects;

use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::prelude::*;

pub use error::ServeError;

/// Bootstraps the Tokio runtime and starts the internal `async` serving code.
pub fn serve(ctx: &Context) -> Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("Failed to build the Tokio runtime.")?
        .block_on(_serve(ctx))
}

async fn _serve(ctx: &Context) -> Result<()> {
    let address = format!("{}:{}", ctx.config.serve.address, ctx.config.serve.port);
    let address: SocketAddr = address
        .parse()
        .wrap_err_with(|| format!("\"{address}\" is not a valid socket address."))
        .suggestion("Check the [serve] section of your configuration file.")?;

    info!("Serving {:?} on http://{address}", ctx.store.root());

    axum::Server::try_bind(&address)
        .wrap_err_with(|| format!("Could not bind to {address}."))?
        .serve(router(ctx.clone()).into_make_service())
        .await
        .wrap_err("The server exited unexpectedly.")?;

    Ok(())
}

/// Builds the application router over a shared [`Context`].
pub fn router(ctx: Context) -> Router {
    let upload_limit = ctx.config.serve.upload_limit;

    Router::new()
        .route(
            "/api/projects",
            get(projects::list).post(projects::create),
        )
        .route(
            "/api/projects/:project",
            get(projects::show).delete(projects::delete),
        )
        .route(
            "/api/projects/:project/markdowns",
            post(projects::create_markdown),
        )
        .route(
            "/api/projects/:project/markdowns/:id",
            get(projects::read_markdown)
                .put(projects::write_markdown)
                .delete(projects::delete_markdown),
        )
        .route("/api/projects/:project/preview", post(projects::preview))
        .route("/projects/:project/markdowns/:id", get(projects::preview_markdown))
        .route(
            "/api/images/:project",
            get(images::list).post(images::upload),
        )
        .route(
            "/api/projects/:project/images/:image",
            axum::routing::delete(images::delete),
        )
        .route("/projects/:project/img/:image", get(images::fetch))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Runs blocking work (file I/O, rendering) off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, ServeError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        // Flattens the task panicking and the work itself failing into one error.
        .map_err(Report::from)
        .and_then(std::convert::identity)
        .map_err(ServeError::from)
}
