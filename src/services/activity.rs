//! Audit trail of mutations. Entries are written in the same batch as the
//! change they describe; this module only reads them back.

use crate::api::HandlerError;
use crate::app::App;
use crate::entities::ActivityLog;
use crate::model::{ModelStore, ModelsExt};
use crate::pagination::{paginate, Page, PageRequest};
use crate::policy::{ensure_admin, Actor};

use super::{data, newest_first};

#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub user_id: Option<String>,
    pub action: Option<String>,
}

pub fn list<S: ModelStore>(
    app: &App<S>,
    actor: &Actor,
    filter: &ActivityFilter,
    request: PageRequest,
) -> Result<Page<ActivityLog>, HandlerError> {
    ensure_admin(actor)?;
    let mut entries = data(app.store().models::<ActivityLog>().find(&|log| {
        filter.user_id.as_deref().map_or(true, |id| log.user_id == id)
            && filter.action.as_deref().map_or(true, |action| log.action == action)
    })?);
    entries.sort_by(|a, b| newest_first((&a.created_at, &a.id), (&b.created_at, &b.id)));
    Ok(paginate(entries, request))
}
