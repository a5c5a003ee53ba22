/// Staged diff text produced after `git add`. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    diff: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl ChangeSet {
    pub fn new(diff: impl Into<String>) -> Self {
        Self { diff: diff.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.diff
    }

    pub fn is_empty(&self) -> bool {
        self.diff.trim().is_empty()
    }

    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::default();
        // `---`/`+++` are file markers only between `diff --git` and the first hunk.
        let mut in_header = false;
        for line in self.diff.lines() {
            if line.starts_with("diff --git ") {
                stats.files_changed += 1;
                in_header = true;
            } else if line.starts_with("@@") {
                in_header = false;
            } else if in_header {
                continue;
            } else if line.starts_with('+') {
                stats.insertions += 1;
            } else if line.starts_with('-') {
                stats.deletions += 1;
            }
        }
        stats
    }
}

impl std::fmt::Display for DiffStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} file(s) changed, {} insertion(s)(+), {} deletion(s)(-)",
            self.files_changed, self.insertions, self.deletions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DIFF: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
index 1111111..2222222 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,4 @@
 fn main() {
-    println!(\"old\");
+    println!(\"new\");
+    println!(\"extra\");
 }
diff --git a/README.md b/README.md
new file mode 100644
--- /dev/null
+++ b/README.md
@@ -0,0 +1 @@
+# Title
";

    #[test]
    fn counts_files_and_lines() {
        let stats = ChangeSet::new(SAMPLE_DIFF).stats();
        assert_eq!(
            stats,
            DiffStats {
                files_changed: 2,
                insertions: 3,
                deletions: 1,
            }
        );
        assert_eq!(
            stats.to_string(),
            "2 file(s) changed, 3 insertion(s)(+), 1 deletion(s)(-)"
        );
    }

    #[test]
    fn hunk_lines_resembling_file_markers_are_counted() {
        let diff = "\
diff --git a/schema.sql b/schema.sql
index 1111111..2222222 100644
--- a/schema.sql
+++ b/schema.sql
@@ -1,2 +1,2 @@
--- sql comment
+++counter;
 select 1;
";
        assert_eq!(
            ChangeSet::new(diff).stats(),
            DiffStats {
                files_changed: 1,
                insertions: 1,
                deletions: 1,
            }
        );
    }

    #[test]
    fn whitespace_only_diff_is_empty() {
        assert!(ChangeSet::new("").is_empty());
        assert!(ChangeSet::new("\n  \n").is_empty());
        assert!(!ChangeSet::new("added line X").is_empty());
    }
}
