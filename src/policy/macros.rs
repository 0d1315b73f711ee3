/// Authorize an action on an entity, returning early if not permitted.
///
/// Expands to a call to [`crate::policy::authorize`] followed by `?`, so the
/// enclosing function must return an error type that converts from
/// [`crate::policy::PermissionError`] (such as `RequestError`, which maps it
/// to 401 or 403).
///
/// # Usage
///
/// ```rust,ignore
/// use rowguard::authorize;
///
/// // Check read permission
/// authorize!(read, &note);
///
/// // Check write permission
/// authorize!(write, &note);
///
/// // Check create permission
/// authorize!(create, &note);
/// ```
#[macro_export]
macro_rules! authorize {
    (read, $entity:expr) => {
        $crate::policy::authorize($entity, $crate::policy::Action::Read)?
    };
    (write, $entity:expr) => {
        $crate::policy::authorize($entity, $crate::policy::Action::Write)?
    };
    (create, $entity:expr) => {
        $crate::policy::authorize($entity, $crate::policy::Action::Create)?
    };
}

/// Check that every new entity reachable from `$roots` in `$graph` may be
/// created, returning early otherwise.
///
/// # Usage
///
/// ```rust,ignore
/// use rowguard::authorize_create_graph;
///
/// authorize_create_graph!(&graph, &roots);
/// ```
#[macro_export]
macro_rules! authorize_create_graph {
    ($graph:expr, $roots:expr) => {
        $crate::policy::EntityGraph::check_create($graph, $roots)?
    };
}
