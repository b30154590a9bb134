/*!
 * Tags.
 *
 * A tag names one data point of a device together with the protocol specific
 * definition needed to reach it. Adapter types describe the layout of their
 * tags with [`AdapterInformation::tag_configuration_type`].
 *
 * [`AdapterInformation::tag_configuration_type`]: crate::information::AdapterInformation::tag_configuration_type
 */

/// Name of the tag configuration type of adapters that declare none
pub const UNTYPED_TAG: &str = "Tag";

/// A named data point of a device
pub trait Tag {
    /// Protocol specific address of the data point
    type Definition;

    /// Name the values of this tag are published under
    fn name(&self) -> &str;

    /// Free text description
    fn description(&self) -> Option<&str> {
        None
    }

    /// How the adapter reaches the data point
    fn definition(&self) -> &Self::Definition;
}
