//! 演示如何在 library 模式下使用 genome-matcher。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_match
//! ```

use std::io::Cursor;

use genome_matcher::io::fasta;
use genome_matcher::util::dna;
use genome_matcher::GenomeMatcher;

const LIBRARY: &str = "\
>Halobacterium jilantaiense
TCTCAAGGGCAACGCGGGCGCGGTCGCGATGGAGAACACGCGAGCGCAACCGCCCTTCCG
CCGCGCAACCCGCGTCAAGGCGCGCACCGGCACCGTCCACTCGCGTCCGCGGTCGCCCGT
>Halorubrum chaoviator
CTCAAGGGCAACGCGGGCGCGGTCGCGATGGAGAACACGCGAGCGCAACCGCGGTACGCT
AACGTGCTCAAGCGGTCGTCCGCGCGCCGGTACGCGGTCGTCTCGCAACGCGTCAAGGGC
>Short
ACGT
";

fn main() -> anyhow::Result<()> {
    // 1. 加载基因组库
    let genomes = fasta::load_genomes(Cursor::new(LIBRARY))?;
    println!("加载了 {} 条基因组", genomes.len());

    // 2. 建立索引（K = 10，短于 K 的基因组被忽略）
    let mut matcher = GenomeMatcher::new(10);
    for g in &genomes {
        matcher.add_genome(g);
    }
    println!("索引了 {} 条基因组（K={}）", matcher.genomes().len(), matcher.minimum_search_length());

    // 3. 片段查询：精确 vs 一次替换
    let fragment = b"GGGCAACGCGGGCGCGGTCGCGATGGAGAACACGCGAGCGCAACCGCTTT";
    for exact in [true, false] {
        println!("\n片段查询（exact={}）:", exact);
        match matcher.find_genomes_with_this_dna(fragment, 20, exact) {
            Ok(hits) => {
                for h in &hits {
                    let genome = matcher.genomes().iter().find(|g| g.name() == h.genome_name);
                    let mism = genome
                        .and_then(|g| g.extract(h.position, h.length))
                        .map_or(0, |s| dna::hamming(s, &fragment[..h.length]));
                    println!("  {} pos={} len={} mismatches={}", h.genome_name, h.position, h.length, mism);
                }
            }
            Err(e) => println!("  {}", e),
        }
    }

    // 4. 相似度查询
    let query = &genomes[0];
    println!("\n与 '{}' 相似的基因组:", query.name());
    match matcher.find_related_genomes(query, 20, false, 0.0) {
        Ok(related) => {
            for r in &related {
                println!("  {} {:.2}%", r.genome_name, r.percent_match);
            }
        }
        Err(e) => println!("  {}", e),
    }

    println!("\n完成！");
    Ok(())
}
