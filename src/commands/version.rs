use std::{env, fmt::Write};

use strum::IntoEnumIterator;

use crate::{app_info::AppInfo, roles::Role};

/// Version report for `app`, one line per entry.
pub fn version_report(app: AppInfo) -> String {
    let core = AppInfo::rowguard();
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let rustc_version = option_env!("RUSTC_VERSION").unwrap_or("unknown");
    let roles = Role::iter().map(|role| role.to_string()).collect::<Vec<_>>();

    let mut report = format!("📦 {app}\n");
    if !app.description.is_empty() {
        let _ = writeln!(report, "📝 {}", app.description);
    }
    if !app.is_rowguard() {
        let _ = writeln!(report, "🧱 Uses {core}");
    }
    let _ = writeln!(report, "🔐 Roles: {}", roles.join(" > "));
    let _ = writeln!(report);
    let _ = writeln!(report, "🔨 Build Information:");
    let _ = writeln!(report, "  🔗 Git Hash: {git_hash}");
    let _ = writeln!(report, "  🦀 Rust Version: {rustc_version}");
    let _ = writeln!(report, "  🖥️  Platform: {}/{}", env::consts::OS, env::consts::ARCH);
    report
}

pub fn print_version_info(app: AppInfo) {
    print!("{}", version_report(app));
}
