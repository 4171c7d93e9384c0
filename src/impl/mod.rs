// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod auth_datasource;
        pub(crate) mod backend_client;
        pub(crate) mod table_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod transaction_row_model;
        pub(crate) mod user_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod auth_repository_impl;
        pub(crate) mod transactions_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod category;
        pub(crate) mod feed;
        pub(crate) mod identity;
        pub(crate) mod raw_record;
        pub(crate) mod session;
        pub(crate) mod summary;
        pub(crate) mod transaction;
    }
    pub(crate) mod logic {
        pub(crate) mod aggregation;
        pub(crate) mod identity_normalizer;
        pub(crate) mod record_mapper;
        pub(crate) mod search_term_expander;
        pub(crate) mod transaction_form_impl;
        pub(crate) mod utils;
    }
    pub(crate) mod repositories {
        pub(crate) mod auth_repository;
        pub(crate) mod transactions_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod reconciliation_usecase;
        pub(crate) mod session_usecase;
    }
}

pub(crate) mod presentation {
    pub(crate) mod amount_fmt;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::category::*;
        pub use crate::domain::entities::feed::*;
        pub use crate::domain::entities::identity::*;
        pub use crate::domain::entities::raw_record::*;
        pub use crate::domain::entities::session::*;
        pub use crate::domain::entities::summary::*;
        pub use crate::domain::entities::transaction::*;
    }

    pub mod logic {
        pub use crate::domain::logic::aggregation::{breakdown_by_category, summarize};
        pub use crate::domain::logic::identity_normalizer::IdentityNormalizer;
        pub use crate::domain::logic::record_mapper::{
            signed_amount, RecordMapper, UNCATEGORIZED, UNNAMED_TRANSACTION,
        };
        pub use crate::domain::logic::search_term_expander::SearchTermExpander;
    }

    pub mod repositories {
        pub use crate::domain::repositories::auth_repository::AuthRepository;
        pub use crate::domain::repositories::transactions_repository::TransactionsRepository;
    }

    pub mod usecases {
        pub use crate::domain::usecases::reconciliation_usecase::{
            ReconciliationUsecase, ReconciliationUsecaseImpl,
        };
        pub use crate::domain::usecases::session_usecase::{
            resolve_profile_identity, SessionUsecase, SessionUsecaseImpl,
        };
    }

    pub mod presentation {
        pub use crate::presentation::amount_fmt::{format_amount, format_signed_amount};
    }
}
