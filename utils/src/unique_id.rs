/// Hands out labels of the form `PREFIX_<n>`.
///
/// One counter is shared by every prefix, so `LOOP_START_0` is followed by `LOOP_END_1`. A
/// generator lives for exactly one compilation; the next compilation starts again at zero.
#[derive(Debug, Default)]
pub struct LabelGenerator {
    next_id: u64,
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temp_label_name(&mut self, prefix: &str) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("{prefix}_{id}")
    }

    /// How many labels were handed out so far.
    pub fn issued(&self) -> u64 {
        self.next_id
    }
}
