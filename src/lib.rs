//! # genome-matcher
//!
//! 内存中的 DNA 序列库索引，回答两类查询：
//!
//! - **片段查询**：哪些基因组包含给定片段（精确，或至多一处碱基替换）
//! - **相似度查询**：把查询序列切成互不重叠的窗口，统计每条基因组命中窗口的百分比
//!
//! 实现要点：
//!
//! - **索引**：定长 K-mer 前缀树，支持精确查找与“一次替换”查找
//! - **种子延伸**：以 K-mer 命中为种子，逐碱基贪心延伸，带替换预算
//! - **聚合打分**：每条基因组只保留最优匹配，按窗口命中率排序
//!
//! ## 快速示例
//!
//! ```rust
//! use genome_matcher::{Genome, GenomeMatcher};
//!
//! let mut matcher = GenomeMatcher::new(4);
//! matcher.add_genome(&Genome::new("G1", b"ACGTACGT".to_vec()));
//!
//! let hits = matcher.find_genomes_with_this_dna(b"ACGT", 4, true).unwrap();
//! assert_eq!(hits[0].genome_name, "G1");
//! assert_eq!(hits[0].position, 0);
//! ```
//!
//! ## 模块说明
//!
//! - [`genome`] — 不可变的命名序列
//! - [`index`] — K-mer 前缀树
//! - [`matcher`] — 基因组库、片段查询、相似度打分
//! - [`io`] — 严格的 FASTA 风格基因组加载
//! - [`util`] — DNA 字母表工具函数

pub mod genome;
pub mod index;
pub mod io;
pub mod matcher;
pub mod util;

pub use genome::Genome;
pub use index::trie::Trie;
pub use matcher::{DnaMatch, GenomeMatch, GenomeMatcher, QueryError};
