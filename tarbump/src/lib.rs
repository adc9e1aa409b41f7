// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0
pub use self::credentials::Credentials;
pub use self::tarball::Tarball;
pub use self::update::Update;
pub use self::version::PackageVersion;

pub mod changes;
pub mod credentials;
pub mod download;
pub mod github;
pub mod recipe;
pub mod tarball;
pub mod update;
pub mod version;

/// Sent with every request, GitHub rejects requests without one
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
