use crate::crud::RouteInfo;

/// Handle the `routes` command - lists every route generated by a blueprint.
pub fn print_routes(routes: &[RouteInfo]) {
    println!("📍 Application Routes\n");

    println!("{:<7} {:<32} DESCRIPTION", "METHOD", "PATH");
    println!("{}", "─".repeat(90));
    println!("{:<7} {:<32} Health check (liveness probe)", "GET", "/liveness");
    println!("{:<7} {:<32} Health check (readiness probe)", "GET", "/readiness");

    for route in routes {
        let mut route = route.clone();
        route.path = format!("/api{}", route.path);
        println!("{route}");
    }

    if routes.is_empty() {
        println!("\n💡 No CRUD blueprints are registered.");
    }
}
