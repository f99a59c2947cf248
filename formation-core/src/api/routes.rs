macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Versioned backend route definitions
pub mod v1 {
    pub const ROOT: &str = "/api/v1";

    pub mod auth {
        pub const LOGIN: &str = v1_path!("/auth/login");
        pub const REGISTER: &str = v1_path!("/auth/register");
    }

    pub mod users {
        pub const CURRENT: &str = v1_path!("/users/me");
    }

    pub mod contents {
        pub const COLLECTION: &str = v1_path!("/contents");
        pub const SEARCH: &str = v1_path!("/search");
    }

    pub mod watch {
        pub const HISTORY: &str = v1_path!("/watch-history");
    }

    pub mod likes {
        pub const COLLECTION: &str = v1_path!("/likes");
        pub const TOGGLE: &str = v1_path!("/likes/{id}/toggle");
    }
}
