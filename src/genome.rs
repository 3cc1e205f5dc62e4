/// 一条命名的 DNA 序列（碱基取自 {A, T, G, C, N}），构建后不可变。
///
/// 由 [`crate::io::fasta`] 的加载器生成，加入 [`crate::matcher::GenomeMatcher`]
/// 后归其 library 所有。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    name: String,
    bases: Vec<u8>,
}

impl Genome {
    /// `bases` 不能为空；加载器保证这一点，其它调用方需自行保证
    pub fn new(name: impl Into<String>, bases: impl Into<Vec<u8>>) -> Self {
        let bases = bases.into();
        debug_assert!(!bases.is_empty(), "genome bases must be non-empty");
        Self { name: name.into(), bases }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// 取出区间 [position, position + length)；越界时返回 None
    pub fn extract(&self, position: usize, length: usize) -> Option<&[u8]> {
        let end = position.checked_add(length)?;
        self.bases.get(position..end)
    }
}
