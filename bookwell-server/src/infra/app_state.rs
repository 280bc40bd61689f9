use std::{fmt, sync::Arc};

use bookwell_config::Config;
use bookwell_core::application::{
    AppUnitOfWork, BookingLifecycleService, DistanceFeedService, HistoryService,
    JobAccessService, ListingPolicy, NotificationDispatcher,
    history::DEFAULT_HISTORY_LIMIT,
};
use bookwell_core::domain::RoleMapping;
use bookwell_core::i18n::MessageCatalog;

/// Tunables the request path needs, lifted out of the full [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub roles: RoleMapping,
    pub listing: ListingPolicy,
    pub history_limit: i64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            roles: RoleMapping::default(),
            listing: ListingPolicy::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl From<&Config> for RuntimeSettings {
    fn from(config: &Config) -> Self {
        Self {
            roles: RoleMapping {
                admin_user_type: config.auth.admin_role_id,
                superadmin_user_type: config.auth.superadmin_role_id,
            },
            listing: ListingPolicy {
                restrict_target_to_self: config.listing.restrict_target_to_self,
                default_per_page: config.listing.default_per_page,
            },
            history_limit: config.history.limit,
        }
    }
}

/// Application services wired against one unit of work.
#[derive(Debug)]
pub struct Services {
    pub access: JobAccessService,
    pub lifecycle: BookingLifecycleService,
    pub feed: DistanceFeedService,
    pub history: HistoryService,
    pub dispatcher: NotificationDispatcher,
}

impl Services {
    pub fn new(unit_of_work: &AppUnitOfWork, settings: &RuntimeSettings) -> Self {
        let jobs = unit_of_work.jobs.clone();
        Self {
            access: JobAccessService::new(jobs.clone(), settings.listing),
            lifecycle: BookingLifecycleService::new(jobs.clone()),
            feed: DistanceFeedService::new(jobs.clone()),
            history: HistoryService::new(jobs.clone()).with_limit(settings.history_limit),
            dispatcher: NotificationDispatcher::new(jobs, unit_of_work.notifications.clone()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: Arc<AppUnitOfWork>,
    pub services: Arc<Services>,
    pub catalog: Arc<MessageCatalog>,
    pub settings: RuntimeSettings,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("unit_of_work", &self.unit_of_work)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        unit_of_work: AppUnitOfWork,
        settings: RuntimeSettings,
        catalog: MessageCatalog,
    ) -> Self {
        let services = Services::new(&unit_of_work, &settings);
        Self {
            unit_of_work: Arc::new(unit_of_work),
            services: Arc::new(services),
            catalog: Arc::new(catalog),
            settings,
        }
    }

    pub fn roles(&self) -> &RoleMapping {
        &self.settings.roles
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }
}
