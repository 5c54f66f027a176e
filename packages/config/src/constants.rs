// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Folio

// Server Configuration
pub const FOLIO_API_PORT: &str = "FOLIO_API_PORT";
pub const FOLIO_API_HOST: &str = "FOLIO_API_HOST";
pub const PORT: &str = "PORT"; // Legacy

// CORS Configuration
pub const FOLIO_CORS_ORIGIN: &str = "FOLIO_CORS_ORIGIN";

// Database Configuration
pub const FOLIO_DATABASE_PATH: &str = "FOLIO_DATABASE_PATH";
pub const FOLIO_DB_MAX_CONNECTIONS: &str = "FOLIO_DB_MAX_CONNECTIONS";
