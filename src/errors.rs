use fractic_server_error::{define_client_error, define_internal_error};

// Identity-related.
define_client_error!(
    InvalidIdentity,
    "Invalid phone number '{input}'. Include the area code (at least 10 digits).",
    { input: &str }
);
define_client_error!(
    IdentityNotConfigured,
    "No WhatsApp number configured. Add a phone number to the profile first."
);

// Store-related.
define_client_error!(
    StoreQueryFailed,
    "Could not read transactions from any store. Try again."
);
define_client_error!(
    StoreWriteFailed,
    "Could not write to the '{store}' store.",
    { store: &str }
);
define_client_error!(
    InvalidTransactionForm,
    "Invalid transaction: {details}.",
    { details: &str }
);

// Auth-related.
define_client_error!(AuthFailed, "Authentication failed.");
define_client_error!(NotSignedIn, "No active session. Sign in first.");

// Backend transport.
define_internal_error!(
    BackendRequestFailed,
    "Request to '{endpoint}' failed.",
    { endpoint: &str }
);
define_internal_error!(
    InvalidBackendResponse,
    "Unexpected response from '{endpoint}'.",
    { endpoint: &str }
);

// Configuration.
define_client_error!(
    MissingConfig,
    "Missing configuration value: {key}.",
    { key: &str }
);
define_client_error!(InvalidConfig, "Invalid backend configuration.");
