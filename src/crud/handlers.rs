use std::sync::Arc;

use axum::extract::{Path, Query, State};
use serde_json::Value;
use tracing::{debug, trace};

use super::{
    methods::{CrudMethod, MethodOverrides, MethodTable},
    model::CrudModel,
    repository::{Filters, Repository},
};
use crate::{
    api::{
        request_result::{Pagination, RequestError, RequestResult, RequestSuccess},
        validated_json::ValidatedJson,
    },
    auth::{resolve_actor, ActorResolution},
    authorize, authorize_create_graph,
    policy::Permissions,
};

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

/// Everything the generated handlers of one blueprint share.
pub(crate) struct CrudContext<M: CrudModel> {
    pub name: String,
    pub res_id: String,
    pub methods: MethodTable,
    pub repository: Arc<dyn Repository<M>>,
}

impl<M: CrudModel> CrudContext<M> {
    /// Enforce the access annotations of `method`.
    ///
    /// Outside of any operation (no authentication middleware installed) the
    /// annotations are not enforced, matching the permission engine.
    fn guard(&self, method: CrudMethod) -> Result<&MethodOverrides, RequestError> {
        let overrides = self
            .methods
            .get(method)
            .ok_or_else(|| RequestError::Internal(format!("{method} is not enabled for {}", self.name)))?;

        match resolve_actor() {
            ActorResolution::NoContext => Ok(overrides),
            ActorResolution::Unauthenticated(reason) => {
                if overrides.public && !overrides.admin_only {
                    Ok(overrides)
                } else {
                    debug!(blueprint = %self.name, %method, %reason, "Rejected unauthenticated request");
                    Err(RequestError::Unauthenticated)
                }
            }
            ActorResolution::Authenticated(actor) => {
                if overrides.admin_only && !actor.is_admin() {
                    debug!(blueprint = %self.name, %method, actor_id = %actor.id, "Rejected non-admin request");
                    Err(RequestError::Forbidden(format!(
                        "{method} on {} is restricted to administrators",
                        self.name
                    )))
                } else {
                    Ok(overrides)
                }
            }
        }
    }

    async fn find(&self, overrides: &MethodOverrides, id: &str) -> Result<M, RequestError> {
        let field = overrides.res_id.as_deref().unwrap_or(&self.res_id);

        self.repository
            .find_by(field, id)
            .await?
            .ok_or_else(|| RequestError::not_found(&self.name))
    }
}

/// Render a record for the response, flagging whether the actor may write it.
fn present<M: CrudModel>(record: &M, view: Option<&str>) -> Value {
    let mut body = record.render(view);
    if let Value::Object(fields) = &mut body {
        fields.insert(
            "is_writable".to_string(),
            Value::Bool(record.can_write().unwrap_or(false)),
        );
    }
    body
}

fn take_number(filters: &mut Filters, key: &str) -> Result<Option<usize>, RequestError> {
    filters
        .remove(key)
        .map(|value| {
            value
                .parse::<usize>()
                .map_err(|_| RequestError::BadRequest(format!("{key} must be a positive integer")))
        })
        .transpose()
}

pub(crate) async fn index<M: CrudModel>(
    State(ctx): State<Arc<CrudContext<M>>>,
    Query(mut filters): Query<Filters>,
) -> RequestResult {
    let overrides = ctx.guard(CrudMethod::Index)?;
    let page = take_number(&mut filters, "page")?;
    let page_size = take_number(&mut filters, "page_size")?;

    let records = ctx.repository.query(&filters).await?;
    let total_fetched = records.len();
    let mut readable = Vec::with_capacity(total_fetched);
    for record in records {
        if record.can_read()? {
            readable.push(record);
        }
    }
    trace!(
        blueprint = %ctx.name,
        fetched = total_fetched,
        readable = readable.len(),
        "Filtered index by read permission"
    );

    let view = overrides.schema.as_deref();
    if page.is_none() && page_size.is_none() {
        let items = readable.iter().map(|record| present(record, view)).collect();
        return Ok(RequestSuccess::Ok(Value::Array(items)));
    }

    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let pagination = Pagination {
        total: readable.len(),
        total_pages: readable.len().div_ceil(page_size),
        page,
        page_size,
    };
    // Pages past the end, including ones whose offset overflows, are empty.
    let offset = (page - 1).checked_mul(page_size).unwrap_or(usize::MAX);
    let items = readable
        .iter()
        .skip(offset)
        .take(page_size)
        .map(|record| present(record, view))
        .collect();

    Ok(RequestSuccess::Paginated(Value::Array(items), pagination))
}

pub(crate) async fn show<M: CrudModel>(
    State(ctx): State<Arc<CrudContext<M>>>,
    Path(id): Path<String>,
) -> RequestResult {
    let overrides = ctx.guard(CrudMethod::Get)?;
    let record = ctx.find(overrides, &id).await?;

    authorize!(read, &record);

    Ok(RequestSuccess::Ok(present(&record, overrides.schema.as_deref())))
}

pub(crate) async fn create<M: CrudModel>(
    State(ctx): State<Arc<CrudContext<M>>>,
    ValidatedJson(payload): ValidatedJson<M::Create>,
) -> RequestResult {
    let overrides = ctx.guard(CrudMethod::Post)?;
    let record = M::from_create(payload)?;

    {
        let (graph, roots) = record.creation_graph();
        authorize_create_graph!(&graph, &roots);
    }

    let saved = ctx.repository.save(record).await?;
    debug!(blueprint = %ctx.name, record = %saved.describe(), "Created record");

    Ok(RequestSuccess::Created(present(&saved, overrides.schema.as_deref())))
}

pub(crate) async fn update<M: CrudModel>(
    State(ctx): State<Arc<CrudContext<M>>>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<M::Update>,
) -> RequestResult {
    let overrides = ctx.guard(CrudMethod::Patch)?;
    let mut record = ctx.find(overrides, &id).await?;

    authorize!(write, &record);

    record.apply_update(payload)?;
    let updated = ctx.repository.update(record).await?;
    debug!(blueprint = %ctx.name, record = %updated.describe(), "Updated record");

    Ok(RequestSuccess::Ok(present(&updated, overrides.schema.as_deref())))
}

pub(crate) async fn destroy<M: CrudModel>(
    State(ctx): State<Arc<CrudContext<M>>>,
    Path(id): Path<String>,
) -> RequestResult {
    let overrides = ctx.guard(CrudMethod::Delete)?;
    let record = ctx.find(overrides, &id).await?;

    authorize!(write, &record);

    ctx.repository.delete(&record).await?;
    debug!(blueprint = %ctx.name, record = %record.describe(), "Deleted record");

    Ok(RequestSuccess::NoContent)
}
