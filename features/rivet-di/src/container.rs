use std::{
    any::{type_name, TypeId},
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    sync::Arc,
};

use crate::{
    errors::LookupError,
    types::{Injectable, Instance},
};

/// Read-only lookup over the beans built so far
///
/// Handed to post processors during boot; the finished [`Container`] exposes
/// the same operations over the frozen registry.
pub struct RegistryView<'a> {
    instances: &'a BTreeMap<String, Instance>,
    types: &'a HashMap<TypeId, Vec<String>>,
}

impl<'a> RegistryView<'a> {
    pub(crate) fn new(
        instances: &'a BTreeMap<String, Instance>,
        types: &'a HashMap<TypeId, Vec<String>>,
    ) -> Self {
        RegistryView { instances, types }
    }

    /// The raw instance registered under `identity`, if built already
    pub fn instance(&self, identity: &str) -> Option<&Instance> {
        self.instances.get(identity)
    }

    /// The sole bean whose produced type is `T`
    pub fn get_by_type<T: Injectable>(&self) -> Result<Arc<T>, LookupError> {
        let identities = self
            .types
            .get(&TypeId::of::<T>())
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        match identities {
            [] => Err(LookupError::NoSuchBean {
                type_name: type_name::<T>(),
            }),
            [identity] => self.downcast::<T>(identity),
            many => Err(LookupError::NoUniqueBean {
                type_name: type_name::<T>(),
                count: many.len(),
            }),
        }
    }

    /// The bean registered under `name`, downcast to `T`
    ///
    /// A name bound to a different produced type is reported as not found.
    pub fn get_by_name<T: Injectable>(&self, name: &str) -> Result<Arc<T>, LookupError> {
        let not_found = LookupError::NoSuchBean {
            type_name: type_name::<T>(),
        };

        let instance = self.instances.get(name).ok_or_else(|| not_found.clone())?;
        instance.downcast::<T>().map_err(|_| not_found)
    }

    /// Every bean whose produced type is `T`, keyed by identity
    ///
    /// An empty map, never an error, when nothing matches.
    pub fn get_all_by_type<T: Injectable>(&self) -> BTreeMap<String, Arc<T>> {
        self.types
            .get(&TypeId::of::<T>())
            .into_iter()
            .flatten()
            .filter_map(|identity| {
                let value = self.instances.get(identity)?.downcast::<T>().ok()?;
                Some((identity.clone(), value))
            })
            .collect()
    }

    fn downcast<T: Injectable>(&self, identity: &str) -> Result<Arc<T>, LookupError> {
        let instance = self.instances.get(identity).ok_or(LookupError::NoSuchBean {
            type_name: type_name::<T>(),
        })?;

        instance.downcast::<T>().map_err(|actual| LookupError::Downcast {
            identity: identity.to_string(),
            required: type_name::<T>(),
            actual,
        })
    }
}

/// The finished, queryable identity → instance registry
///
/// Created by a successful boot and frozen from then on: no mutation is
/// exposed, cloning shares the same snapshot, and concurrent reads from any
/// number of threads are safe.
#[derive(Clone)]
pub struct Container(Arc<ContainerInner>);

struct ContainerInner {
    instances: BTreeMap<String, Instance>,
    types: HashMap<TypeId, Vec<String>>,
}

impl Container {
    pub(crate) fn new(
        instances: BTreeMap<String, Instance>,
        types: HashMap<TypeId, Vec<String>>,
    ) -> Self {
        Container(Arc::new(ContainerInner { instances, types }))
    }

    fn view(&self) -> RegistryView<'_> {
        RegistryView::new(&self.0.instances, &self.0.types)
    }

    /// The sole bean whose produced type is `T`
    pub fn get_by_type<T: Injectable>(&self) -> Result<Arc<T>, LookupError> {
        self.view().get_by_type::<T>()
    }

    /// The bean registered under `name`, downcast to `T`
    pub fn get_by_name<T: Injectable>(&self, name: &str) -> Result<Arc<T>, LookupError> {
        self.view().get_by_name::<T>(name)
    }

    /// Every bean whose produced type is `T`, keyed by identity
    pub fn get_all_by_type<T: Injectable>(&self) -> BTreeMap<String, Arc<T>> {
        self.view().get_all_by_type::<T>()
    }

    pub fn len(&self) -> usize {
        self.0.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.instances.is_empty()
    }

    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.0.instances.keys().map(String::as_str)
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("Container");
        for (identity, instance) in &self.0.instances {
            map.field(identity, &instance.info.type_name);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Solo(&'static str);
    #[derive(Debug)]
    struct Twin;

    fn sample() -> Container {
        let mut instances = BTreeMap::new();
        let mut types: HashMap<TypeId, Vec<String>> = HashMap::new();

        for (identity, instance) in [
            ("solo".to_string(), Instance::new(Solo("solo"))),
            ("twin_one".to_string(), Instance::new(Twin)),
            ("twin_two".to_string(), Instance::new(Twin)),
        ] {
            types
                .entry(instance.info.type_id)
                .or_default()
                .push(identity.clone());
            instances.insert(identity, instance);
        }

        Container::new(instances, types)
    }

    #[test]
    fn by_type_returns_the_sole_match() {
        let container = sample();
        let solo = container.get_by_type::<Solo>().unwrap();
        assert_eq!(solo.0, "solo");
    }

    #[test]
    fn by_type_with_no_match_is_no_such_bean() {
        #[derive(Debug)]
        struct Unregistered;
        let err = sample().get_by_type::<Unregistered>().unwrap_err();
        assert!(matches!(err, LookupError::NoSuchBean { .. }));
    }

    #[test]
    fn by_type_with_two_matches_is_no_unique_bean() {
        let err = sample().get_by_type::<Twin>().unwrap_err();
        assert!(matches!(err, LookupError::NoUniqueBean { count: 2, .. }));
    }

    #[test]
    fn by_name_disambiguates() {
        let container = sample();
        container.get_by_name::<Twin>("twin_one").unwrap();
        container.get_by_name::<Twin>("twin_two").unwrap();
    }

    #[test]
    fn by_name_with_wrong_type_is_no_such_bean() {
        let err = sample().get_by_name::<Solo>("twin_one").unwrap_err();
        assert!(matches!(err, LookupError::NoSuchBean { .. }));
    }

    #[test]
    fn all_by_type_maps_every_match_by_identity() {
        let all = sample().get_all_by_type::<Twin>();
        assert_eq!(
            all.keys().collect::<Vec<_>>(),
            vec!["twin_one", "twin_two"]
        );
    }

    #[test]
    fn all_by_type_with_no_match_is_empty() {
        #[derive(Debug)]
        struct Unregistered;
        assert!(sample().get_all_by_type::<Unregistered>().is_empty());
    }
}
