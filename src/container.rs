//! Variant-parameterized student store.
//!
//! Records live in a single arena owned by [`StudentDb`]. The sequence and
//! the index only hold [`RecordId`] handles into it, so a rating written
//! through the index is the rating seen when walking the sequence.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::record::{Student, DATASET_HEADER};
use crate::storage::{
    new_index, new_sequence, FastHashMap, RecordId, RecordIndex, RecordSequence, MAX_RECORDS,
};
use crate::variant::Variant;

/// Display form of an unavailable [`StudentDb::best_group`] answer.
pub const BEST_GROUP_NONE: &str = "N/A";

pub struct StudentDb {
    variant: Variant,
    records: Vec<Student>,
    sequence: Box<dyn RecordSequence>,
    index: Box<dyn RecordIndex>,
}

impl std::fmt::Debug for StudentDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudentDb")
            .field("variant", &self.variant)
            .field("records", &self.records.len())
            .field("indexed", &self.index.len())
            .finish()
    }
}

#[derive(Default)]
struct GroupAcc {
    sum: f64,
    count: u32,
    ranked: bool,
}

impl GroupAcc {
    #[inline]
    fn average(&self) -> f64 {
        self.sum / self.count as f64
    }
}

impl StudentDb {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            records: Vec::new(),
            sequence: new_sequence(variant.sequence_kind()),
            index: new_index(variant.index_kind()),
        }
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Number of records in the sequence, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    #[inline]
    fn record(&self, id: RecordId) -> &Student {
        &self.records[id as usize]
    }

    /// Appends a record and indexes it by email. A repeated email replaces the
    /// index entry while both records stay in the sequence.
    ///
    /// # Panics
    ///
    /// Panics once the container already holds [`MAX_RECORDS`] records. Use
    /// [`StudentDb::try_push`] to get an error instead.
    pub fn push(&mut self, student: Student) {
        self.try_push(student).expect("too many records in StudentDb");
    }

    /// Like [`StudentDb::push`], but fails when no [`RecordId`] is left.
    pub fn try_push(&mut self, student: Student) -> Result<()> {
        let id: RecordId = self.records.len().try_into().map_err(|_| {
            anyhow::anyhow!("StudentDb is full: at most {MAX_RECORDS} records are supported")
        })?;
        let key = student.email.clone();
        self.records.push(student);
        self.sequence.push(id);
        if self.index.insert(key, id).is_some() {
            debug!("duplicate email, index now points at record {id}");
        }
        Ok(())
    }

    /// Bulk load from a dataset file. Returns the number of records added.
    pub fn load_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("failed to open dataset {}", path.display()))?;
        let added = self
            .load_from_reader(BufReader::new(file))
            .with_context(|| format!("failed to load dataset {}", path.display()))?;
        info!(
            "{}: loaded {added} records from {}",
            self.variant,
            path.display()
        );
        Ok(added)
    }

    /// Reads header plus data lines from `reader`. Rows with too few fields are
    /// skipped; a bad numeric field aborts the load.
    pub fn load_from_reader<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut added = 0usize;
        let mut skipped = 0usize;
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if lineno == 0 {
                continue;
            }
            let line = line.trim_end_matches('\r');
            match Student::parse_line(line).with_context(|| format!("line {}", lineno + 1))? {
                Some(st) => {
                    self.try_push(st)?;
                    added += 1;
                }
                None => {
                    debug!("skipping malformed row at line {}", lineno + 1);
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            warn!("skipped {skipped} malformed rows");
        }
        Ok(added)
    }

    /// Looks a record up by email through the index.
    pub fn get(&self, email: &str) -> Option<&Student> {
        self.index.get(email).map(|id| self.record(id))
    }

    /// Records in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &Student> + '_ {
        self.sequence.iter().map(move |id| self.record(id))
    }

    /// Emails in sequence order.
    pub fn emails(&self) -> Vec<String> {
        self.iter().map(|s| s.email.clone()).collect()
    }

    /// The `n` best rated records, highest first. Equal ratings keep their
    /// sequence order.
    pub fn top(&self, n: usize) -> Vec<&Student> {
        let mut ids = self.sequence.to_vec();
        ids.sort_by_key(|&id| Reverse(OrderedFloat(self.record(id).rating)));
        ids.truncate(n);
        ids.into_iter().map(|id| self.record(id)).collect()
    }

    /// Overwrites the rating of the record indexed under `email`. Unknown
    /// emails are ignored.
    pub fn set_rating(&mut self, email: &str, rating: f32) {
        if let Some(id) = self.index.get(email) {
            self.records[id as usize].rating = rating;
        }
    }

    /// Group with the highest average rating, `None` when empty.
    ///
    /// Every record in the sequence contributes to its group's average. Groups
    /// are ranked by first discovery while walking the index; on equal
    /// averages the earlier ranked group wins. Groups reachable only through
    /// records shadowed by a duplicate email rank last, in sequence order.
    /// Hash index order is fixed for one container but not across runs.
    pub fn best_group(&self) -> Option<&str> {
        if self.is_empty() {
            return None;
        }
        let mut groups: FastHashMap<&str, GroupAcc> = FastHashMap::default();
        for st in self.iter() {
            let acc = groups.entry(st.group.as_str()).or_default();
            acc.sum += f64::from(st.rating);
            acc.count += 1;
        }

        let mut order: Vec<&str> = Vec::with_capacity(groups.len());
        let discovery = self
            .index
            .iter()
            .map(|id| self.record(id))
            .chain(self.iter());
        for st in discovery {
            if order.len() == groups.len() {
                break;
            }
            let group = st.group.as_str();
            if let Some(acc) = groups.get_mut(group) {
                if !acc.ranked {
                    acc.ranked = true;
                    order.push(group);
                }
            }
        }

        let mut best: Option<(&str, f64)> = None;
        for group in order {
            let avg = groups[group].average();
            match best {
                Some((_, top)) if avg <= top => {}
                _ => best = Some((group, avg)),
            }
        }
        best.map(|(group, _)| group)
    }

    /// Stable sort of the sequence by (birth month, birth day).
    pub fn sort_by_birthdate(&mut self) {
        let records = &self.records;
        self.sequence.sort_by(&mut |a: RecordId, b: RecordId| {
            records[a as usize]
                .birth_month_day()
                .cmp(&records[b as usize].birth_month_day())
        });
    }

    /// Heap sort of the sequence by `month * 100 + day`. Not stable.
    pub fn heap_sort_by_birthdate(&mut self) {
        let mut arr = self.sequence.to_vec();
        let records = &self.records;
        let keys = |id: RecordId| records[id as usize].birth_key();
        let n = arr.len();
        for root in (0..n / 2).rev() {
            sift_down(&mut arr, n, root, &keys);
        }
        for end in (1..n).rev() {
            arr.swap(0, end);
            sift_down(&mut arr, end, 0, &keys);
        }
        self.sequence.replace(arr);
    }

    /// Writes the records in sequence order, header first.
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        writeln!(w, "{DATASET_HEADER}")?;
        for st in self.iter() {
            st.write_csv(&mut w)?;
        }
        w.flush()?;
        Ok(())
    }
}

/// Restores the max-heap property below `root` within `arr[..heap_len]`.
fn sift_down<F>(arr: &mut [RecordId], heap_len: usize, mut root: usize, key: &F)
where
    F: Fn(RecordId) -> i32,
{
    loop {
        let mut largest = root;
        let left = 2 * root + 1;
        let right = left + 1;
        if left < heap_len && key(arr[left]) > key(arr[largest]) {
            largest = left;
        }
        if right < heap_len && key(arr[right]) > key(arr[largest]) {
            largest = right;
        }
        if largest == root {
            return;
        }
        arr.swap(root, largest);
        root = largest;
    }
}
