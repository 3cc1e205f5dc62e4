use std::collections::BTreeMap;

use log::debug;

use super::{DnaMatch, GenomeMatcher, QueryError};

/// 单条基因组上当前最优的候选
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    position: usize,
    length: usize,
}

impl GenomeMatcher {
    /// 查找包含 `fragment` 的基因组。
    ///
    /// 先用片段前 K 个碱基在索引中取种子（`exact_match_only == false` 时允许一次替换），
    /// 再对每个种子调用 [`extend_seed`] 贪心延伸，最后每条基因组只保留一条结果：
    /// 长者优先，等长取较小的 position，短于 `minimum_length` 的丢弃。
    ///
    /// 结果按基因组名排序；没有任何结果时返回 [`QueryError::NoMatches`]。
    pub fn find_genomes_with_this_dna(
        &self,
        fragment: &[u8],
        minimum_length: usize,
        exact_match_only: bool,
    ) -> Result<Vec<DnaMatch>, QueryError> {
        let k = self.min_search_length;
        if fragment.len() < minimum_length {
            return Err(QueryError::FragmentTooShort { fragment: fragment.len(), minimum: minimum_length });
        }
        if minimum_length < k {
            return Err(QueryError::MinimumBelowSearchLength { minimum: minimum_length, search: k });
        }

        let seeds = self.trie.find(&fragment[..k], exact_match_only);
        debug!("fragment of {} bp: {} seed hits (exact={})", fragment.len(), seeds.len(), exact_match_only);

        let mut best: BTreeMap<&str, Candidate> = BTreeMap::new();
        for hit in seeds {
            let genome = &self.genomes[hit.genome];
            let Some(length) = extend_seed(genome.bases(), hit.position, fragment, exact_match_only) else {
                continue;
            };
            if length < minimum_length {
                continue;
            }
            let cand = Candidate { position: hit.position, length };
            best.entry(genome.name())
                .and_modify(|cur| {
                    if cand.length > cur.length || (cand.length == cur.length && cand.position < cur.position) {
                        *cur = cand;
                    }
                })
                .or_insert(cand);
        }

        if best.is_empty() {
            return Err(QueryError::NoMatches);
        }
        Ok(best
            .into_iter()
            .map(|(name, c)| DnaMatch { genome_name: name.to_string(), position: c.position, length: c.length })
            .collect())
    }
}

/// 从 `reference[position..]` 开始逐个碱基延伸，返回应记录的匹配长度。
///
/// 规则：
/// - 参考序列在延伸前就已耗尽时返回 None（不记录）；
/// - 与整个片段完全一致时立即返回片段长度；
/// - 精确模式：出现错配或到达参考末尾即停止；到达末尾时记录已取出的全部长度
///   （即使末位是错配），否则记录错配前的长度；
/// - 近似模式：一旦与片段前缀不一致，每个新错配计一次替换；到达参考末尾且替换数
///   不为 2 时记录全部长度，第 2 次替换时记录其之前的长度，片段用完时记录片段长度。
///   前缀仍完全一致时到达参考末尾，不记录任何结果。
///
/// 种子中的替换同样计入近似模式的替换数。
pub fn extend_seed(reference: &[u8], position: usize, fragment: &[u8], exact_match_only: bool) -> Option<usize> {
    let mut diverged = false;
    let mut substitutions = 0usize;

    for (i, &want) in fragment.iter().enumerate() {
        let len = i + 1;
        let &base = reference.get(position + i)?;
        let reached_end = reference.len() == position + len;
        let mismatch = base != want;
        diverged |= mismatch;

        if !diverged && len == fragment.len() {
            return Some(len);
        }

        if exact_match_only {
            if diverged || reached_end {
                return Some(if reached_end { len } else { i });
            }
        } else if diverged {
            if mismatch {
                substitutions += 1;
            }
            if reached_end && substitutions != 2 {
                return Some(len);
            }
            if substitutions == 2 {
                return Some(i);
            }
            if len == fragment.len() {
                return Some(len);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genome;
    use crate::util::dna;

    fn matcher(k: usize, genomes: &[(&str, &str)]) -> GenomeMatcher {
        let mut m = GenomeMatcher::new(k);
        for (name, seq) in genomes {
            m.add_genome(&Genome::new(*name, seq.as_bytes()));
        }
        m
    }

    fn hit(name: &str, position: usize, length: usize) -> DnaMatch {
        DnaMatch { genome_name: name.to_string(), position, length }
    }

    #[test]
    fn equal_length_hits_keep_smallest_position() {
        let m = matcher(4, &[("G1", "ACGTACGT")]);
        let got = m.find_genomes_with_this_dna(b"ACGT", 4, true).unwrap();
        assert_eq!(got, vec![hit("G1", 0, 4)]);
    }

    #[test]
    fn exact_extension_stops_before_mismatch() {
        let m = matcher(4, &[("G1", "ACGTACGTTT")]);
        let got = m.find_genomes_with_this_dna(b"ACGTACGAAA", 4, true).unwrap();
        // 位置 0 延伸到 7，位置 4 只有 4，取较长者
        assert_eq!(got, vec![hit("G1", 0, 7)]);
    }

    #[test]
    fn exact_extension_stops_at_genome_end() {
        let m = matcher(4, &[("G1", "GGACGTAC")]);
        let got = m.find_genomes_with_this_dna(b"ACGTACGT", 4, true).unwrap();
        assert_eq!(got, vec![hit("G1", 2, 6)]);
    }

    #[test]
    fn exact_mode_counts_mismatch_on_final_base() {
        // 参考在错配处恰好结束时，错配碱基也计入长度
        let m = matcher(4, &[("G1", "TTACGTAG")]);
        let got = m.find_genomes_with_this_dna(b"ACGTACGT", 4, true).unwrap();
        assert_eq!(got, vec![hit("G1", 2, 6)]);
    }

    #[test]
    fn approximate_tolerates_one_substitution() {
        let m = matcher(4, &[("G1", "ACGTACCTACGT")]);
        let frag = b"ACGTACGTACGT";
        assert!(m.find_genomes_with_this_dna(frag, 12, true).is_err());

        let got = m.find_genomes_with_this_dna(frag, 12, false).unwrap();
        assert_eq!(got, vec![hit("G1", 0, 12)]);
        let g = &m.genomes()[0];
        assert_eq!(dna::hamming(g.extract(0, 12).unwrap(), frag), 1);
    }

    #[test]
    fn second_substitution_truncates() {
        let m = matcher(4, &[("G1", "ACGTACCTACCTAAAA")]);
        let got = m.find_genomes_with_this_dna(b"ACGTACGTACGTAAAA", 4, false).unwrap();
        assert_eq!(got, vec![hit("G1", 0, 10)]);
    }

    #[test]
    fn seed_substitution_shares_extension_budget() {
        // 种子 "AGGT" 经一次替换命中，延伸中再遇错配即截断；
        // 两个长度 8 的候选取较小 position
        let m = matcher(4, &[("G1", "AGGTACGTTCGT")]);
        let got = m.find_genomes_with_this_dna(b"ACGTACGTACGT", 4, false).unwrap();
        assert_eq!(got, vec![hit("G1", 0, 8)]);
    }

    #[test]
    fn approximate_mode_drops_exact_run_into_genome_end() {
        let m = matcher(4, &[("G1", "TTTTACGTAC")]);
        assert_eq!(
            m.find_genomes_with_this_dna(b"ACGTACGT", 4, false),
            Err(QueryError::NoMatches)
        );
        assert_eq!(m.find_genomes_with_this_dna(b"ACGTACGT", 4, true).unwrap(), vec![hit("G1", 4, 6)]);
    }

    #[test]
    fn approximate_keeps_full_length_when_genome_ends_after_substitution() {
        // 错配之后、片段用完之前参考序列结束：记录已取出的全部长度
        let m = matcher(4, &[("G1", "ACGTAC")]);
        let got = m.find_genomes_with_this_dna(b"ACGAACGT", 4, false).unwrap();
        assert_eq!(got, vec![hit("G1", 0, 6)]);
        assert_eq!(extend_seed(b"ACGTAC", 0, b"ACGAACGT", false), Some(6));
    }

    #[test]
    fn one_match_per_genome_sorted_by_name() {
        let m = matcher(
            4,
            &[("zeta", "CCACGTACGT"), ("alpha", "ACGTACGAC"), ("beta", "TTTTTTTT")],
        );
        let got = m.find_genomes_with_this_dna(b"ACGTACGT", 4, true).unwrap();
        assert_eq!(got, vec![hit("alpha", 0, 7), hit("zeta", 2, 8)]);
    }

    #[test]
    fn genomes_sharing_a_name_collapse() {
        let m = matcher(4, &[("dup", "ACGTAAAA"), ("dup", "ACGTACGT")]);
        let got = m.find_genomes_with_this_dna(b"ACGTACGT", 4, true).unwrap();
        assert_eq!(got, vec![hit("dup", 0, 8)]);
    }

    #[test]
    fn short_matches_are_filtered() {
        let m = matcher(4, &[("G1", "ACGTTTTT")]);
        assert_eq!(
            m.find_genomes_with_this_dna(b"ACGTACGT", 6, true),
            Err(QueryError::NoMatches)
        );
        assert_eq!(m.find_genomes_with_this_dna(b"ACGTACGT", 4, true).unwrap(), vec![hit("G1", 0, 4)]);
    }

    #[test]
    fn preconditions_are_reported() {
        let m = matcher(4, &[("G1", "ACGTACGT")]);
        assert_eq!(
            m.find_genomes_with_this_dna(b"ACG", 4, true),
            Err(QueryError::FragmentTooShort { fragment: 3, minimum: 4 })
        );
        assert_eq!(
            m.find_genomes_with_this_dna(b"ACGTACGT", 3, true),
            Err(QueryError::MinimumBelowSearchLength { minimum: 3, search: 4 })
        );
    }

    #[test]
    fn excluded_short_genome_never_matches() {
        let m = matcher(4, &[("G1", "AAA")]);
        assert_eq!(m.find_genomes_with_this_dna(b"AAAA", 4, false), Err(QueryError::NoMatches));
    }

    #[test]
    fn extend_seed_stops_when_reference_exhausted() {
        assert_eq!(extend_seed(b"ACGT", 4, b"ACGT", true), None);
        assert_eq!(extend_seed(b"ACGT", 0, b"ACGT", false), Some(4));
        assert_eq!(extend_seed(b"ACGTA", 1, b"CGTAC", true), Some(4));
    }
}
