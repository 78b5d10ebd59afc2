use crate::error::Result;
use crate::record::{Member, Scalar};
use crate::version::Versions;

/// The per-operation mediator between records and a physical backend.
///
/// A session is created for exactly one save or one load of one root record
/// and is borrowed by every [`Record::serialize`] call of that walk. Whether it
/// reads or writes is fixed for its whole lifetime.
///
/// Every field operation first runs [`gate`](crate::gate) against the session's
/// [`version`](Self::version). Fields outside their [`Versions`] range are not
/// transferred at all; reading sessions assign the default instead.
///
/// [`Record::serialize`]: crate::Record::serialize
pub trait Session {
    /// Whether this session populates records from a stream.
    fn is_reading(&self) -> bool;

    /// The version being written, or the version read from the stream header.
    fn version(&self) -> u32;

    /// The newest version known to the record family.
    fn latest_version(&self) -> u32;

    /// Transfers a primitive field.
    ///
    /// `default` is assigned when the field is absent from the stream. The
    /// binary backend also omits fields equal to their default.
    ///
    /// # Errors
    ///
    /// Returns an error if the field's version range is invalid, the object
    /// holds too many fields, or the backend fails.
    fn scalar<T: Scalar>(
        &mut self,
        name: &str,
        value: &mut T,
        default: T,
        versions: Versions,
    ) -> Result<()>;

    /// Transfers a nested record. [`None`] is the field's default.
    ///
    /// # Errors
    ///
    /// Returns an error if the field's version range is invalid, the object
    /// holds too many fields, the member's type tag is unknown, or the
    /// backend fails.
    fn object<T: Member>(
        &mut self,
        name: &str,
        value: &mut Option<T>,
        versions: Versions,
    ) -> Result<()>;

    /// Transfers an ordered list of records. An empty list is the field's
    /// default.
    ///
    /// # Errors
    ///
    /// Returns an error if the field's version range is invalid, the object
    /// holds too many fields, the list is too long for the backend, an
    /// element's type tag is unknown, or the backend fails.
    fn object_array<T: Member>(
        &mut self,
        name: &str,
        values: &mut Vec<T>,
        versions: Versions,
    ) -> Result<()>;
}
