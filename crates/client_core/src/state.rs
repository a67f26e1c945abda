use shared::domain::{Address, Customer, Entity};

use crate::filters::{AddressFilters, ListDeps};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
}

/// Collection snapshot shared by both stores.
///
/// `last_error` and `last_success` are never both set.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<E> {
    /// Server response order.
    pub collection: Vec<E>,
    pub focus: Option<E>,
    pub status: Status,
    pub last_error: Option<String>,
    pub last_success: Option<String>,
}

impl<E> Default for EntityState<E> {
    fn default() -> Self {
        Self {
            collection: Vec::new(),
            focus: None,
            status: Status::Idle,
            last_error: None,
            last_success: None,
        }
    }
}

impl<E: Entity> EntityState<E> {
    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn find(&self, id: E::Id) -> Option<&E> {
        self.collection.iter().find(|entity| entity.id() == id)
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.status = if loading {
            Status::Loading
        } else {
            Status::Idle
        };
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.last_error = Some(message);
        self.last_success = None;
        self.status = Status::Idle;
    }

    pub(crate) fn succeed(&mut self, message: String) {
        self.last_success = Some(message);
        self.last_error = None;
        self.status = Status::Idle;
    }

    pub(crate) fn clear_messages(&mut self) {
        self.last_error = None;
        self.last_success = None;
    }

    pub(crate) fn set_collection(&mut self, items: Vec<E>) {
        self.collection = items;
        self.status = Status::Idle;
    }

    pub(crate) fn set_focus(&mut self, entity: E) {
        self.focus = Some(entity);
        self.status = Status::Idle;
    }

    /// Newest first.
    pub(crate) fn insert(&mut self, entity: E) {
        self.collection.insert(0, entity.clone());
        self.focus = Some(entity);
        self.status = Status::Idle;
    }

    /// Focus follows `entity` even when no member carries its id.
    pub(crate) fn replace(&mut self, entity: E) {
        let id = entity.id();
        if let Some(member) = self.collection.iter_mut().find(|member| member.id() == id) {
            *member = entity.clone();
        }
        self.focus = Some(entity);
        self.status = Status::Idle;
    }

    pub(crate) fn remove(&mut self, id: E::Id) {
        self.collection.retain(|member| member.id() != id);
        self.focus = None;
        self.status = Status::Idle;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerState {
    pub entities: EntityState<Customer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based.
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub total_count: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            total_pages: 1,
            total_count: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressState {
    pub entities: EntityState<Address>,
    pub filters: AddressFilters,
    pub pagination: Pagination,
}

impl AddressState {
    pub fn with_page_size(limit: u32) -> Self {
        Self {
            pagination: Pagination::with_limit(limit),
            ..Self::default()
        }
    }

    pub fn list_deps(&self) -> ListDeps {
        ListDeps {
            filters: self.filters.clone(),
            page: self.pagination.page,
            limit: self.pagination.limit,
        }
    }
}
