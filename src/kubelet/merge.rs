use super::flags::FlagMap;

/// Copy every entry of `source` into `target` whose key `target` lacks.
///
/// Existing target entries are never overwritten or removed, which is how
/// operator-set values beat computed defaults. Returns the number of keys
/// filled in.
pub fn fill_missing(target: &mut FlagMap, source: &FlagMap) -> usize {
    let mut filled = 0;
    for (key, value) in source {
        if target.set_if_absent(key, value) {
            filled += 1;
        }
    }
    filled
}
