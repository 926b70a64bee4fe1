use std::sync::Arc;

use address_form::AddressDto;
use serde::Serialize;
use tracing::{info, warn};

use super::api::{AddressApi, AddressId, ApiError, StoredAddress};

/// Shown in place of the list when loading failed.
pub const LOAD_FAILED_MESSAGE: &str = "주소 목록을 불러오지 못했습니다.";

/// Snapshot of the address book as the UI renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressBookState {
    pub items: Vec<StoredAddress>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AddressBookState {
    pub fn find(&self, id: AddressId) -> Option<&StoredAddress> {
        self.items.iter().find(|a| a.id == id)
    }
}

/// Mutation requested by the UI, executed off the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookCommand {
    Reload,
    Add(AddressDto),
    Update(AddressId, AddressDto),
    Remove(AddressId),
    SetDefault(AddressId),
    Seed,
}

/// The customer's stored addresses over an `AddressApi`.
pub struct AddressListController {
    api: Arc<dyn AddressApi>,
    state: AddressBookState,
}

impl AddressListController {
    pub fn new(api: Arc<dyn AddressApi>) -> Self {
        Self {
            api,
            state: AddressBookState::default(),
        }
    }

    pub fn state(&self) -> &AddressBookState {
        &self.state
    }

    pub fn items(&self) -> &[StoredAddress] {
        &self.state.items
    }

    /// Refetch the list. Failures end up in `state.error`, never in the result.
    pub async fn reload(&mut self) {
        self.state.loading = true;
        self.state.error = None;
        match self.api.list().await {
            Ok(items) => self.state.items = items,
            Err(err) => {
                warn!(error = %err, "loading addresses failed");
                self.state.error = Some(LOAD_FAILED_MESSAGE.to_string());
            }
        }
        self.state.loading = false;
    }

    pub async fn add(&mut self, dto: &AddressDto) -> Result<(), ApiError> {
        let created = self.api.create(dto).await?;
        info!(id = created.id, "address created");
        self.reload().await;
        Ok(())
    }

    pub async fn update(&mut self, id: AddressId, dto: &AddressDto) -> Result<(), ApiError> {
        self.api.update(id, dto).await?;
        info!(id, "address updated");
        self.reload().await;
        Ok(())
    }

    /// Delete remotely, then drop the entry locally without a reload.
    pub async fn remove(&mut self, id: AddressId) -> Result<(), ApiError> {
        self.api.remove(id).await?;
        info!(id, "address removed");
        self.state.items.retain(|a| a.id != id);
        Ok(())
    }

    pub async fn set_default(&mut self, id: AddressId) -> Result<(), ApiError> {
        self.api.set_default(id).await?;
        info!(id, "default address changed");
        self.reload().await;
        Ok(())
    }

    pub async fn seed(&mut self) -> Result<Option<StoredAddress>, ApiError> {
        let seeded = self.api.seed().await?;
        info!(id = seeded.as_ref().map(|a| a.id), "address seeded from profile");
        self.reload().await;
        Ok(seeded)
    }

    /// Run one command; mutation errors are logged and returned.
    pub async fn execute(&mut self, command: BookCommand) -> Result<(), ApiError> {
        let result = match command {
            BookCommand::Reload => {
                self.reload().await;
                Ok(())
            }
            BookCommand::Add(dto) => self.add(&dto).await,
            BookCommand::Update(id, dto) => self.update(id, &dto).await,
            BookCommand::Remove(id) => self.remove(id).await,
            BookCommand::SetDefault(id) => self.set_default(id).await,
            BookCommand::Seed => self.seed().await.map(|_| ()),
        };
        if let Err(err) = &result {
            warn!(error = %err, "address book command failed");
        }
        result
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tokio::sync::Mutex;

    use super::*;

    /// In-memory address service.
    #[derive(Default)]
    pub struct FakeAddressApi {
        pub items: Mutex<Vec<StoredAddress>>,
        pub next_id: Mutex<AddressId>,
        pub fail_list: AtomicBool,
        pub fail_mutations: AtomicBool,
        pub list_calls: AtomicUsize,
    }

    impl FakeAddressApi {
        pub fn with_items(items: Vec<StoredAddress>) -> Self {
            let next = items.iter().map(|a| a.id).max().unwrap_or(0) + 1;
            Self {
                items: Mutex::new(items),
                next_id: Mutex::new(next),
                ..Default::default()
            }
        }

        fn check_mutation(&self) -> Result<(), ApiError> {
            if self.fail_mutations.load(Ordering::Relaxed) {
                return Err(ApiError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: "boom".into(),
                });
            }
            Ok(())
        }

        fn record(id: AddressId, dto: &AddressDto) -> StoredAddress {
            StoredAddress {
                id,
                name: dto.name.clone(),
                phone: dto.phone.clone(),
                zipcode: dto.zipcode.clone(),
                address1: dto.address1.clone(),
                address2: dto.address2.clone(),
                ..Default::default()
            }
        }

        fn not_found() -> ApiError {
            ApiError::Status {
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            }
        }
    }

    #[async_trait]
    impl AddressApi for FakeAddressApi {
        async fn list(&self) -> Result<Vec<StoredAddress>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::Relaxed);
            if self.fail_list.load(Ordering::Relaxed) {
                return Err(ApiError::Status {
                    status: StatusCode::UNAUTHORIZED,
                    body: String::new(),
                });
            }
            Ok(self.items.lock().await.clone())
        }

        async fn create(&self, dto: &AddressDto) -> Result<StoredAddress, ApiError> {
            self.check_mutation()?;
            let mut next = self.next_id.lock().await;
            let id = (*next).max(1);
            *next = id + 1;
            let record = Self::record(id, dto);
            self.items.lock().await.push(record.clone());
            Ok(record)
        }

        async fn update(&self, id: AddressId, dto: &AddressDto) -> Result<StoredAddress, ApiError> {
            self.check_mutation()?;
            let mut items = self.items.lock().await;
            let slot = items
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(Self::not_found)?;
            let is_default = slot.is_default;
            *slot = StoredAddress {
                is_default,
                ..Self::record(id, dto)
            };
            Ok(slot.clone())
        }

        async fn remove(&self, id: AddressId) -> Result<(), ApiError> {
            self.check_mutation()?;
            self.items.lock().await.retain(|a| a.id != id);
            Ok(())
        }

        async fn set_default(&self, id: AddressId) -> Result<StoredAddress, ApiError> {
            self.check_mutation()?;
            let mut items = self.items.lock().await;
            if !items.iter().any(|a| a.id == id) {
                return Err(Self::not_found());
            }
            for item in items.iter_mut() {
                item.is_default = item.id == id;
            }
            items
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or_else(Self::not_found)
        }

        async fn seed(&self) -> Result<Option<StoredAddress>, ApiError> {
            self.check_mutation()?;
            let mut items = self.items.lock().await;
            if let Some(first) = items.first() {
                return Ok(Some(first.clone()));
            }
            let seeded = StoredAddress {
                id: 1,
                name: "기본".into(),
                is_default: true,
                ..Default::default()
            };
            items.push(seeded.clone());
            Ok(Some(seeded))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::fake::FakeAddressApi;
    use super::*;
    use pretty_assertions::assert_eq;

    fn dto(name: &str) -> AddressDto {
        AddressDto {
            name: name.into(),
            phone: "01012345678".into(),
            zipcode: "12345".into(),
            address1: "서울시".into(),
            address2: "1동".into(),
        }
    }

    fn stored(id: AddressId, name: &str) -> StoredAddress {
        StoredAddress {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn reload_fills_items() {
        let api = Arc::new(FakeAddressApi::with_items(vec![stored(1, "a"), stored(2, "b")]));
        let mut book = AddressListController::new(api);
        book.reload().await;
        assert_eq!(book.items().len(), 2);
        assert!(!book.state().loading);
        assert_eq!(book.state().error, None);
    }

    #[tokio::test]
    async fn failed_reload_keeps_items_and_sets_message() {
        let api = Arc::new(FakeAddressApi::with_items(vec![stored(1, "a")]));
        let mut book = AddressListController::new(api.clone());
        book.reload().await;

        api.fail_list.store(true, Ordering::Relaxed);
        book.reload().await;
        assert_eq!(book.state().error.as_deref(), Some(LOAD_FAILED_MESSAGE));
        assert_eq!(book.items().len(), 1);
        assert!(!book.state().loading);

        api.fail_list.store(false, Ordering::Relaxed);
        book.reload().await;
        assert_eq!(book.state().error, None);
    }

    #[tokio::test]
    async fn add_and_update_reload_the_list() {
        let api = Arc::new(FakeAddressApi::default());
        let mut book = AddressListController::new(api.clone());

        book.add(&dto("김철수")).await.unwrap();
        assert_eq!(book.items().len(), 1);
        let id = book.items()[0].id;

        book.update(id, &dto("홍길동")).await.unwrap();
        assert_eq!(book.items()[0].name, "홍길동");
        assert_eq!(api.list_calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn remove_drops_locally_without_reload() {
        let api = Arc::new(FakeAddressApi::with_items(vec![stored(1, "a"), stored(2, "b")]));
        let mut book = AddressListController::new(api.clone());
        book.reload().await;

        book.remove(1).await.unwrap();
        assert_eq!(book.items().iter().map(|a| a.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(api.list_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn set_default_marks_exactly_one() {
        let api = Arc::new(FakeAddressApi::with_items(vec![stored(1, "a"), stored(2, "b")]));
        let mut book = AddressListController::new(api);
        book.set_default(2).await.unwrap();
        let defaults: Vec<_> = book
            .items()
            .iter()
            .filter(|a| a.is_default)
            .map(|a| a.id)
            .collect();
        assert_eq!(defaults, vec![2]);
        assert!(book.state().find(2).is_some_and(|a| a.is_default));
    }

    #[tokio::test]
    async fn failed_mutation_is_returned_and_list_untouched() {
        let api = Arc::new(FakeAddressApi::with_items(vec![stored(1, "a")]));
        let mut book = AddressListController::new(api.clone());
        book.reload().await;
        api.fail_mutations.store(true, Ordering::Relaxed);

        let err = book.execute(BookCommand::Remove(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { .. }));
        assert_eq!(book.items().len(), 1);
        assert_eq!(book.state().error, None);
    }

    #[tokio::test]
    async fn seed_creates_default_then_reloads() {
        let api = Arc::new(FakeAddressApi::default());
        let mut book = AddressListController::new(api);
        let seeded = book.seed().await.unwrap();
        assert!(seeded.is_some_and(|a| a.is_default));
        assert_eq!(book.items().len(), 1);
    }
}
