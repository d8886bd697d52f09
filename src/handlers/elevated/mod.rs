// handlers/elevated/mod.rs - ADMIN-only administration
//
// Routes from this tier are always mounted behind RoleGuard::admin_only().

pub mod users;
