//! Project, markdown and preview endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{blocking, ServeError};
use crate::prelude::*;
use crate::render;

type ApiResult<T> = std::result::Result<T, ServeError>;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewProject {
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewMarkdown {
    id: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkdownUpdate {
    markdown: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectList {
    projects: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectCreated {
    project: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetails {
    project: String,
    markdowns: Vec<String>,
    images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Markdown {
    id: String,
    markdown: String,
}

pub async fn list(
    State(ctx): State<Context>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ProjectList>> {
    let projects = blocking(move || Ok(ctx.store.projects(query.q.as_deref())?)).await?;
    Ok(Json(ProjectList { projects }))
}

pub async fn create(
    State(ctx): State<Context>,
    Json(body): Json<NewProject>,
) -> ApiResult<(StatusCode, Json<ProjectCreated>)> {
    let project = blocking(move || {
        ctx.store.create_project(&body.name)?;
        Ok(body.name)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(ProjectCreated { project })))
}

pub async fn show(
    State(ctx): State<Context>,
    Path(project): Path<String>,
) -> ApiResult<Json<ProjectDetails>> {
    let details = blocking(move || {
        let markdowns = ctx.store.markdowns(&project)?;
        let images = ctx.store.images(&project)?;
        Ok(ProjectDetails { project, markdowns, images })
    })
    .await?;

    Ok(Json(details))
}

pub async fn delete(
    State(ctx): State<Context>,
    Path(project): Path<String>,
) -> ApiResult<StatusCode> {
    blocking(move || Ok(ctx.store.delete_project(&project)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_markdown(
    State(ctx): State<Context>,
    Path(project): Path<String>,
    Json(body): Json<NewMarkdown>,
) -> ApiResult<(StatusCode, Json<Markdown>)> {
    let id = blocking(move || {
        ctx.store.create_markdown(&project, &body.id)?;
        Ok(body.id)
    })
    .await?;

    let markdown = Markdown {
        id,
        markdown: String::new(),
    };
    Ok((StatusCode::CREATED, Json(markdown)))
}

pub async fn read_markdown(
    State(ctx): State<Context>,
    Path((project, id)): Path<(String, String)>,
) -> ApiResult<Json<Markdown>> {
    let markdown = blocking(move || {
        let markdown = ctx.store.read_markdown(&project, &id)?;
        Ok(Markdown { id, markdown })
    })
    .await?;

    Ok(Json(markdown))
}

pub async fn write_markdown(
    State(ctx): State<Context>,
    Path((project, id)): Path<(String, String)>,
    Json(body): Json<MarkdownUpdate>,
) -> ApiResult<StatusCode> {
    blocking(move || Ok(ctx.store.write_markdown(&project, &id, &body.markdown)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_markdown(
    State(ctx): State<Context>,
    Path((project, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    blocking(move || Ok(ctx.store.delete_markdown(&project, &id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Renders an unsaved document, for the editor's live preview.
pub async fn preview(
    State(ctx): State<Context>,
    Path(project): Path<String>,
    source: String,
) -> ApiResult<Html<String>> {
    let html = blocking(move || {
        let options = ctx.config.render_options(&project);
        render::render(&source, &options)
    })
    .await?;

    Ok(Html(html))
}

/// Renders a stored document.
pub async fn preview_markdown(
    State(ctx): State<Context>,
    Path((project, id)): Path<(String, String)>,
) -> ApiResult<Html<String>> {
    let html = blocking(move || {
        let source = ctx.store.read_markdown(&project, &id)?;
        let options = ctx.config.render_options(&project);
        render::render(&source, &options)
            .wrap_err_with(|| format!("Failed to render markdown {id} in project {project}."))
    })
    .await?;

    Ok(Html(html))
}
