// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::InstanceHandle;
use std::sync::Arc;

/// Publish side of the keyed pub/sub substrate.
///
/// Implemented by the transport's data writer. Methods take `&self` because
/// writers are shared handles: the same writer may serve several pipelines.
pub trait InstanceWriter<T> {
    /// Error reported by the substrate.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Publish one value.
    ///
    /// # Errors
    ///
    /// Returns the substrate's error if the value could not be written.
    fn write(&self, value: &T) -> Result<(), Self::Error>;

    /// Look up (registering if needed) the instance whose key `template` carries.
    ///
    /// # Errors
    ///
    /// Returns the substrate's error if the instance could not be registered.
    fn register_instance(&self, template: &T) -> Result<InstanceHandle, Self::Error>;

    /// Announce the end of life of an instance to every subscriber.
    ///
    /// # Errors
    ///
    /// Returns the substrate's error if the disposal could not be published.
    fn dispose_instance(&self, handle: InstanceHandle) -> Result<(), Self::Error>;
}

impl<T, W> InstanceWriter<T> for &W
where
    W: InstanceWriter<T> + ?Sized,
{
    type Error = W::Error;

    fn write(&self, value: &T) -> Result<(), Self::Error> {
        (**self).write(value)
    }

    fn register_instance(&self, template: &T) -> Result<InstanceHandle, Self::Error> {
        (**self).register_instance(template)
    }

    fn dispose_instance(&self, handle: InstanceHandle) -> Result<(), Self::Error> {
        (**self).dispose_instance(handle)
    }
}

impl<T, W> InstanceWriter<T> for Arc<W>
where
    W: InstanceWriter<T> + ?Sized,
{
    type Error = W::Error;

    fn write(&self, value: &T) -> Result<(), Self::Error> {
        (**self).write(value)
    }

    fn register_instance(&self, template: &T) -> Result<InstanceHandle, Self::Error> {
        (**self).register_instance(template)
    }

    fn dispose_instance(&self, handle: InstanceHandle) -> Result<(), Self::Error> {
        (**self).dispose_instance(handle)
    }
}
