//! 基因组库与查询入口。
//!
//! [`GenomeMatcher`] 持有全部基因组（library），并把每条基因组的每个长度为 K
//! 的窗口写入 [`Trie`]。查询阶段只读：
//!
//! - [`GenomeMatcher::find_genomes_with_this_dna`] — 种子查找 + 贪心延伸，见 [`extend`]
//! - [`GenomeMatcher::find_related_genomes`] — 按窗口统计相似度，见 [`related`]

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::genome::Genome;
use crate::index::trie::Trie;

pub mod extend;
pub mod related;

/// 索引中的种子命中：library 中的基因组下标 + 窗口起点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedHit {
    pub genome: usize,
    pub position: usize,
}

/// 片段查询结果：每条基因组至多一条（最长者胜出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnaMatch {
    pub genome_name: String,
    pub position: usize,
    pub length: usize,
}

/// 相似度查询结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenomeMatch {
    pub genome_name: String,
    pub percent_match: f64,
}

/// 查询失败的原因。
///
/// `NoMatches` 同时覆盖“没有找到”与“没有可用窗口”两种情况，调用方若只关心
/// 成功与否，用 `is_ok()` 即可。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("fragment length {fragment} is shorter than the minimum match length {minimum}")]
    FragmentTooShort { fragment: usize, minimum: usize },
    #[error("minimum match length {minimum} is below the minimum search length {search}")]
    MinimumBelowSearchLength { minimum: usize, search: usize },
    #[error("fragment match length {fragment} is below the minimum search length {search}")]
    FragmentLengthBelowSearchLength { fragment: usize, search: usize },
    #[error("no matches found")]
    NoMatches,
}

#[derive(Debug)]
pub struct GenomeMatcher {
    min_search_length: usize,
    genomes: Vec<Genome>,
    trie: Trie<SeedHit>,
}

impl GenomeMatcher {
    /// `min_search_length` 即种子长度 K，至少为 1
    pub fn new(min_search_length: usize) -> Self {
        Self { min_search_length: min_search_length.max(1), genomes: Vec::new(), trie: Trie::new() }
    }

    pub fn minimum_search_length(&self) -> usize {
        self.min_search_length
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// 加入一条基因组，并把它的每个 K-mer 窗口写入索引。
    /// 短于 K 的基因组被静默忽略，不进入 library。
    pub fn add_genome(&mut self, genome: &Genome) {
        let k = self.min_search_length;
        if genome.len() < k {
            debug!(
                "skipping genome '{}': length {} < minimum search length {}",
                genome.name(),
                genome.len(),
                k
            );
            return;
        }

        let idx = self.genomes.len();
        self.genomes.push(genome.clone());
        for (position, window) in genome.bases().windows(k).enumerate() {
            self.trie.insert(window, SeedHit { genome: idx, position });
        }
        debug!(
            "indexed genome '{}' ({} bp): trie now holds {} seeds in {} nodes",
            genome.name(),
            genome.len(),
            self.trie.len(),
            self.trie.node_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_window_is_addressable() {
        let seq = b"ACGTTGCAAGTCN";
        let mut m = GenomeMatcher::new(4);
        m.add_genome(&Genome::new("g", seq.to_vec()));
        for p in 0..=seq.len() - 4 {
            let hits = m.trie.find(&seq[p..p + 4], true);
            assert!(hits.contains(&SeedHit { genome: 0, position: p }), "window {p}");
        }
        assert_eq!(m.trie.len(), seq.len() - 3);
    }

    #[test]
    fn genome_of_exactly_k_is_kept() {
        let mut m = GenomeMatcher::new(4);
        m.add_genome(&Genome::new("G1", b"AAAA".to_vec()));
        assert_eq!(m.genomes().len(), 1);
        assert_eq!(m.trie.find(b"AAAA", true), vec![SeedHit { genome: 0, position: 0 }]);
    }

    #[test]
    fn genome_shorter_than_k_is_skipped() {
        let mut m = GenomeMatcher::new(4);
        m.add_genome(&Genome::new("G1", b"AAA".to_vec()));
        assert!(m.genomes().is_empty());
        assert!(m.trie.is_empty());
        assert_eq!(m.minimum_search_length(), 4);
    }
}
