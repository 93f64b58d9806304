//! Aligned sequence input.
//!
//! Alignment itself is done elsewhere; this module only holds sequences that
//! are already gap-padded to a common length.

use crate::error::{PhyloError, Result};
use serde::{Deserialize, Serialize};

/// Reserved gap character of aligned sequences.
pub const GAP_CHAR: u8 = b'-';

/// Alphabet of a sequence, deciding the Jukes-Cantor correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alphabet {
    Dna,
    Rna,
    Protein,
}

impl Alphabet {
    /// Returns `true` for DNA and RNA.
    pub fn is_nucleotide(&self) -> bool {
        matches!(self, Alphabet::Dna | Alphabet::Rna)
    }
}

// =#========================================================================#=
// ALIGNED SEQUENCE
// =#========================================================================#=
/// A single row of an alignment: display name, alphabet and residues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedSequence {
    name: String,
    alphabet: Alphabet,
    data: Vec<u8>,
}

impl AlignedSequence {
    /// Creates a new aligned sequence. Residues are compared byte-wise.
    pub fn new<N: Into<String>, D: AsRef<[u8]>>(name: N, alphabet: Alphabet, data: D) -> Self {
        Self {
            name: name.into(),
            alphabet,
            data: data.as_ref().to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Alignment length, including gaps.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if position `k` holds the gap character.
    pub fn is_gap(&self, k: usize) -> bool {
        self.data[k] == GAP_CHAR
    }
}

// =#========================================================================#=
// ALIGNED SEQUENCE SET
// =#========================================================================#=
/// Ordered set of aligned sequences of identical length.
///
/// # Invariants
/// - All sequences have the same length (checked on construction)
///
/// The minimum of three sequences is checked by
/// [DistanceMatrix::compute](crate::distance::DistanceMatrix::compute),
/// since smaller sets are still useful for other purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedSequenceSet {
    sequences: Vec<AlignedSequence>,
}

impl AlignedSequenceSet {
    /// Creates a set from already aligned sequences.
    ///
    /// # Errors
    /// [PhyloError::InvalidInput] if the sequences differ in length.
    pub fn new(sequences: Vec<AlignedSequence>) -> Result<Self> {
        if let Some(first) = sequences.first() {
            let expected = first.len();
            for (i, seq) in sequences.iter().enumerate() {
                if seq.len() != expected {
                    return Err(PhyloError::invalid_input(format!(
                        "Input sequences must be aligned: sequence {} ({}) has length {}, expected {}",
                        i,
                        seq.name(),
                        seq.len(),
                        expected
                    )));
                }
            }
        }
        Ok(Self { sequences })
    }

    /// Reads an aligned FASTA text, tagging every record with `alphabet`.
    ///
    /// Blank lines are skipped, header and sequence lines are trimmed and
    /// multi-line sequences are joined.
    ///
    /// # Errors
    /// [PhyloError::InvalidInput] if sequence data appears before the first
    /// header or if the records are not of equal length.
    ///
    /// # Example
    /// ```
    /// use phylowick::sequence::{AlignedSequenceSet, Alphabet};
    ///
    /// let set = AlignedSequenceSet::from_fasta_str(">a\nAC-T\n>b\nACGT\n", Alphabet::Dna).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.alignment_len(), 4);
    /// ```
    pub fn from_fasta_str(input: &str, alphabet: Alphabet) -> Result<Self> {
        let mut sequences = Vec::new();
        let mut current_name: Option<String> = None;
        let mut current_seq = String::new();

        for line in input.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix('>') {
                if let Some(name) = current_name.replace(rest.trim().to_string()) {
                    sequences.push(AlignedSequence::new(name, alphabet, &current_seq));
                    current_seq.clear();
                }
            } else {
                if current_name.is_none() {
                    return Err(PhyloError::invalid_input("FASTA sequence encountered before any header"));
                }
                current_seq.push_str(trimmed);
            }
        }

        if let Some(name) = current_name {
            sequences.push(AlignedSequence::new(name, alphabet, &current_seq));
        }

        Self::new(sequences)
    }

    /// Number of sequences.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Common length of all sequences, 0 for an empty set.
    pub fn alignment_len(&self) -> usize {
        self.sequences.first().map_or(0, |s| s.len())
    }

    /// Alphabet of the first sequence, which decides alphabet-dependent corrections.
    pub fn alphabet(&self) -> Option<Alphabet> {
        self.sequences.first().map(|s| s.alphabet())
    }

    /// Names of the sequences, in input order.
    pub fn names(&self) -> Vec<String> {
        self.sequences.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlignedSequence> {
        self.sequences.iter()
    }
}

impl std::ops::Index<usize> for AlignedSequenceSet {
    type Output = AlignedSequence;

    fn index(&self, index: usize) -> &Self::Output {
        &self.sequences[index]
    }
}
