use std::{any::type_name, marker::PhantomData, str::FromStr, sync::Arc};

use crate::{
    errors::{BlueprintError, ConvertError},
    types::{DynError, Injectable, Instance, TypeInfo},
};

/// Positional, already-resolved dependencies handed to an invocable
pub struct Args<'a> {
    values: &'a [Instance],
}

impl<'a> Args<'a> {
    pub(crate) fn new(values: &'a [Instance]) -> Self {
        Args { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Downcasts the argument at `index` to its declared type
    pub fn get<T: Injectable>(&self, index: usize) -> Result<Arc<T>, DynError> {
        let instance = self.values.get(index).ok_or_else(|| -> DynError {
            format!(
                "argument {index} is out of range ({} resolved)",
                self.values.len()
            )
            .into()
        })?;

        instance.downcast::<T>().map_err(|actual| -> DynError {
            format!(
                "argument {index} holds '{actual}', not the required '{}'",
                type_name::<T>()
            )
            .into()
        })
    }
}

/// Opaque invocable building a bean from its resolved constructor arguments
pub type ConstructorFn = Box<dyn Fn(&Args<'_>) -> Result<Instance, DynError> + Send + Sync>;
/// Opaque invocable producing a bean from a live owner plus resolved arguments
pub type ProducerFn = Box<dyn Fn(&Instance, &Args<'_>) -> Result<Instance, DynError> + Send + Sync>;
/// Fills one field slot on a bean with a resolved dependency
pub type InjectFn = Box<dyn Fn(&Instance, &Instance) -> Result<(), DynError> + Send + Sync>;
/// Converts a raw property value and assigns it to a field slot
pub type AssignFn = Box<dyn Fn(&Instance, &str) -> Result<(), DynError> + Send + Sync>;
/// No-argument hook on a freshly produced bean
pub type InitFn = Box<dyn Fn(&Instance) -> Result<(), DynError> + Send + Sync>;

/// A field-level dependency, injected by the pipeline after construction
pub struct FieldBinding {
    pub dependency: String,
    pub inject: InjectFn,
}

/// An externally configured field
///
/// The lookup key is `key` when given, otherwise the field name.
pub struct ValueBinding {
    pub key: Option<String>,
    pub field: &'static str,
    pub assign: AssignFn,
}

/// Post-construction hook on a factory-produced bean
pub struct InitHook {
    pub name: String,
    pub invoke: InitFn,
}

/// Only singletons exist in this design; the enum is the extension point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Singleton,
}

/// How a blueprint's instance comes to be
pub enum Provenance {
    /// Built by invoking a constructor with resolved arguments
    Component {
        constructor: ConstructorFn,
        constructor_deps: Vec<String>,
        fields: Vec<FieldBinding>,
    },
    /// Produced by invoking a producer operation on a live owner bean
    Factory {
        owner: String,
        producer: ProducerFn,
        producer_deps: Vec<String>,
        init_hook: Option<InitHook>,
    },
}

/// Describes one producible object
///
/// Blueprints are pure data handed to the engine; the invocable handles are
/// built once at composition time and treated as black boxes afterwards.
pub struct Blueprint {
    pub identity: String,
    pub produced: TypeInfo,
    pub scope: Scope,
    pub provenance: Provenance,
    pub values: Vec<ValueBinding>,
}

impl Blueprint {
    pub fn component<T: Injectable>(identity: impl Into<String>) -> ComponentBuilder<T> {
        ComponentBuilder {
            identity: identity.into(),
            constructor: None,
            fields: Vec::new(),
            values: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn factory<T: Injectable>(
        identity: impl Into<String>,
        owner: impl Into<String>,
    ) -> FactoryBuilder<T> {
        FactoryBuilder {
            identity: identity.into(),
            owner: owner.into(),
            producer: None,
            init_hook: None,
            values: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Every identity this blueprint needs before it can be considered ready
    pub fn dependencies(&self) -> Vec<&str> {
        match &self.provenance {
            Provenance::Component {
                constructor_deps,
                fields,
                ..
            } => constructor_deps
                .iter()
                .map(String::as_str)
                .chain(fields.iter().map(|field| field.dependency.as_str()))
                .collect(),
            Provenance::Factory {
                owner,
                producer_deps,
                ..
            } => std::iter::once(owner.as_str())
                .chain(producer_deps.iter().map(String::as_str))
                .collect(),
        }
    }
}

impl std::fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.provenance {
            Provenance::Component { .. } => "component",
            Provenance::Factory { .. } => "factory",
        };
        f.debug_struct("Blueprint")
            .field("identity", &self.identity)
            .field("produced", &self.produced.type_name)
            .field("kind", &kind)
            .field("dependencies", &self.dependencies())
            .finish()
    }
}

fn downcast_bean<T: Injectable>(bean: &Instance) -> Result<Arc<T>, DynError> {
    bean.downcast::<T>().map_err(|actual| -> DynError {
        format!(
            "bean holds '{actual}', not the expected '{}'",
            type_name::<T>()
        )
        .into()
    })
}

fn assign_fn<T, V, F>(set: F) -> AssignFn
where
    T: Injectable,
    V: FromStr + Send + Sync + 'static,
    F: Fn(&T, V) -> Result<(), DynError> + Send + Sync + 'static,
{
    Box::new(move |bean, raw| {
        let bean = downcast_bean::<T>(bean)?;
        let value = raw.parse::<V>().map_err(|_| -> DynError {
            ConvertError {
                value: raw.to_string(),
                target: type_name::<V>(),
            }
            .into()
        })?;
        set(&bean, value)
    })
}

/// Fluent builder for a directly constructed blueprint
pub struct ComponentBuilder<T> {
    identity: String,
    constructor: Option<(Vec<String>, ConstructorFn)>,
    fields: Vec<FieldBinding>,
    values: Vec<ValueBinding>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> ComponentBuilder<T> {
    /// Sets the constructor and its positional dependency identities
    pub fn constructor<F>(mut self, deps: &[&str], build: F) -> Self
    where
        F: Fn(&Args<'_>) -> Result<T, DynError> + Send + Sync + 'static,
    {
        let constructor: ConstructorFn = Box::new(move |args| build(args).map(Instance::new));
        let deps = deps.iter().map(|dep| dep.to_string()).collect();
        self.constructor = Some((deps, constructor));
        self
    }

    /// Declares a field-level dependency, filled after construction
    pub fn field<D, F>(mut self, dependency: &str, fill: F) -> Self
    where
        D: Injectable,
        F: Fn(&T, Arc<D>) -> Result<(), DynError> + Send + Sync + 'static,
    {
        let inject: InjectFn = Box::new(move |bean, dep| {
            let bean = downcast_bean::<T>(bean)?;
            let dep = dep.downcast::<D>().map_err(|actual| -> DynError {
                format!(
                    "dependency holds '{actual}', not the expected '{}'",
                    type_name::<D>()
                )
                .into()
            })?;
            fill(&bean, dep)
        });
        self.fields.push(FieldBinding {
            dependency: dependency.to_string(),
            inject,
        });
        self
    }

    /// Declares an externally configured field, looked up by the field name
    pub fn value<V, F>(self, field: &'static str, set: F) -> Self
    where
        V: FromStr + Send + Sync + 'static,
        F: Fn(&T, V) -> Result<(), DynError> + Send + Sync + 'static,
    {
        self.push_value(None, field, set)
    }

    /// Declares an externally configured field with an explicit lookup key
    pub fn value_keyed<V, F>(self, key: &str, field: &'static str, set: F) -> Self
    where
        V: FromStr + Send + Sync + 'static,
        F: Fn(&T, V) -> Result<(), DynError> + Send + Sync + 'static,
    {
        self.push_value(Some(key.to_string()), field, set)
    }

    fn push_value<V, F>(mut self, key: Option<String>, field: &'static str, set: F) -> Self
    where
        V: FromStr + Send + Sync + 'static,
        F: Fn(&T, V) -> Result<(), DynError> + Send + Sync + 'static,
    {
        self.values.push(ValueBinding {
            key,
            field,
            assign: assign_fn::<T, V, F>(set),
        });
        self
    }

    pub fn build(self) -> Result<Blueprint, BlueprintError> {
        let (constructor_deps, constructor) = self
            .constructor
            .ok_or_else(|| BlueprintError::NoViableConstructor(self.identity.clone()))?;

        Ok(Blueprint {
            identity: self.identity,
            produced: TypeInfo::of::<T>(),
            scope: Scope::Singleton,
            provenance: Provenance::Component {
                constructor,
                constructor_deps,
                fields: self.fields,
            },
            values: self.values,
        })
    }
}

/// Fluent builder for a factory-produced blueprint
pub struct FactoryBuilder<T> {
    identity: String,
    owner: String,
    producer: Option<(Vec<String>, ProducerFn)>,
    init_hook: Option<InitHook>,
    values: Vec<ValueBinding>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> FactoryBuilder<T> {
    /// Sets the producer operation and its positional dependency identities
    ///
    /// `O` is the owner bean's produced type; the producer receives the live
    /// owner plus the resolved arguments.
    pub fn producer<O, F>(mut self, deps: &[&str], produce: F) -> Self
    where
        O: Injectable,
        F: Fn(Arc<O>, &Args<'_>) -> Result<T, DynError> + Send + Sync + 'static,
    {
        let producer: ProducerFn = Box::new(move |owner, args| {
            let owner = owner.downcast::<O>().map_err(|actual| -> DynError {
                format!(
                    "owner holds '{actual}', not the expected '{}'",
                    type_name::<O>()
                )
                .into()
            })?;
            produce(owner, args).map(Instance::new)
        });
        let deps = deps.iter().map(|dep| dep.to_string()).collect();
        self.producer = Some((deps, producer));
        self
    }

    /// Names a no-argument hook invoked on the fresh bean right after
    /// production, before the post-processing pipeline runs
    pub fn init_hook<F>(mut self, name: &str, hook: F) -> Self
    where
        F: Fn(&T) -> Result<(), DynError> + Send + Sync + 'static,
    {
        let invoke: InitFn = Box::new(move |instance| {
            let bean = downcast_bean::<T>(instance)?;
            hook(&bean)
        });
        self.init_hook = Some(InitHook {
            name: name.to_string(),
            invoke,
        });
        self
    }

    /// Declares an externally configured field, looked up by the field name
    pub fn value<V, F>(mut self, field: &'static str, set: F) -> Self
    where
        V: FromStr + Send + Sync + 'static,
        F: Fn(&T, V) -> Result<(), DynError> + Send + Sync + 'static,
    {
        self.values.push(ValueBinding {
            key: None,
            field,
            assign: assign_fn::<T, V, F>(set),
        });
        self
    }

    pub fn build(self) -> Result<Blueprint, BlueprintError> {
        let (producer_deps, producer) = self
            .producer
            .ok_or_else(|| BlueprintError::NoViableProducer(self.identity.clone()))?;

        Ok(Blueprint {
            identity: self.identity,
            produced: TypeInfo::of::<T>(),
            scope: Scope::Singleton,
            provenance: Provenance::Factory {
                owner: self.owner,
                producer,
                producer_deps,
                init_hook: self.init_hook,
            },
            values: self.values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty;

    #[test]
    fn component_without_constructor_is_rejected() {
        let err = Blueprint::component::<Empty>("empty").build().unwrap_err();
        assert_eq!(err, BlueprintError::NoViableConstructor("empty".into()));
    }

    #[test]
    fn factory_without_producer_is_rejected() {
        let err = Blueprint::factory::<Empty>("empty", "owner")
            .build()
            .unwrap_err();
        assert_eq!(err, BlueprintError::NoViableProducer("empty".into()));
    }

    #[test]
    fn dependencies_join_constructor_and_field_identities() {
        struct Svc;
        let blueprint = Blueprint::component::<Svc>("svc")
            .constructor(&["a", "b"], |_| Ok(Svc))
            .field("c", |_svc: &Svc, _dep: Arc<Empty>| Ok(()))
            .build()
            .unwrap();

        assert_eq!(blueprint.dependencies(), vec!["a", "b", "c"]);
    }

    #[test]
    fn factory_dependencies_lead_with_the_owner() {
        struct Owner;
        struct Product;
        let blueprint = Blueprint::factory::<Product>("product", "config")
            .producer(&["dep"], |_owner: Arc<Owner>, _| Ok(Product))
            .build()
            .unwrap();

        assert_eq!(blueprint.dependencies(), vec!["config", "dep"]);
    }
}
