use common::StoreId;

/// Where a customer or basket currently lives.
///
/// A detached value is owned by the engine's registry. Once placed in a
/// store the store owns it and the registry keeps only the store id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Placement<T> {
    Detached(T),
    InStore(StoreId),
}

impl<T> Placement<T> {
    pub(crate) fn store_id(&self) -> Option<&StoreId> {
        match self {
            Placement::Detached(_) => None,
            Placement::InStore(store_id) => Some(store_id),
        }
    }
}
