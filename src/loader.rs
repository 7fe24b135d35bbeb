use crate::error::LoadError;
use std::fs;
use std::path::Path;

/// Raw level rows with their metadata, as read from a collection file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDefinition {
    pub id: usize,
    pub name: String,
    pub lines: Vec<String>,
}

struct Pending {
    next_id: usize,
    title: Option<String>,
    lines: Vec<String>,
    levels: Vec<LevelDefinition>,
}

impl Pending {
    fn flush(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let id = self.next_id;
        self.next_id += 1;
        let name = self
            .title
            .take()
            .unwrap_or_else(|| format!("Level {}", id));
        self.levels.push(LevelDefinition {
            id,
            name,
            lines: std::mem::take(&mut self.lines),
        });
    }
}

/// Parse XSB-formatted Sokoban levels from a string.
///
/// The XSB format uses:
/// - Lines starting with `;` as level separators/comments
/// - Standard Sokoban characters (#, @, $, ., *, +, space)
/// - Empty lines between levels (optional)
///
/// A comment line read while no level is in progress names the next level;
/// otherwise levels are named `Level N`. Ids are 1-based, in file order.
/// Rows are kept verbatim: symbol checks happen when a level is initialized.
pub fn parse_levels(contents: &str) -> Vec<LevelDefinition> {
    let mut pending = Pending {
        next_id: 1,
        title: None,
        lines: Vec::new(),
        levels: Vec::new(),
    };

    for line in contents.lines() {
        // Comment lines end the current level and may name the next one
        if let Some(comment) = line.trim_start().strip_prefix(';') {
            pending.flush();
            let comment = comment.trim();
            if !comment.is_empty() {
                pending.title = Some(comment.to_string());
            }
            continue;
        }

        if line.trim().is_empty() {
            pending.flush();
            continue;
        }

        pending.lines.push(line.trim_end().to_string());
    }

    // Don't forget the last level if file doesn't end with empty line
    pending.flush();
    pending.levels
}

/// Parse XSB-formatted Sokoban levels from a text file.
pub fn read_levels(path: &Path) -> Result<Vec<LevelDefinition>, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_levels(&contents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels_basic() {
        let xsb_content = "\
; Hallway
#######
#@-$-.#
#######

; Bend
 ####
 #__#
##$ ##
#@ . #
######
; Twin goals
######   
#.@$ #
# $. #
######
";

        let levels = parse_levels(xsb_content);

        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].name, "Hallway");
        assert_eq!(levels[0].lines, vec!["#######", "#@-$-.#", "#######"]);

        assert_eq!(levels[1].id, 2);
        assert_eq!(levels[1].name, "Bend");
        assert_eq!(levels[1].lines[0], " ####");
        assert_eq!(levels[1].lines[1], " #__#");
        assert_eq!(levels[1].lines.len(), 5);

        // trailing blanks are dropped, leading ones kept
        assert_eq!(levels[2].id, 3);
        assert_eq!(levels[2].name, "Twin goals");
        assert_eq!(levels[2].lines[0], "######");
        assert_eq!(levels[2].lines.len(), 4);
    }

    #[test]
    fn test_untitled_levels_get_numbered_names() {
        let levels = parse_levels("#####\n#@$.#\n#####\n\n#####\n#.$@#\n#####");
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].name, "Level 1");
        assert_eq!(levels[1].name, "Level 2");
        assert_eq!(levels[1].id, 2);
    }

    #[test]
    fn test_comment_directly_after_level_ends_it() {
        let levels = parse_levels("; Easy\n#####\n#@$.#\n#####\n; Hard\n####\n#@*#\n####\n");
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].name, "Easy");
        assert_eq!(levels[1].name, "Hard");
        assert_eq!(levels[1].lines, vec!["####", "#@*#", "####"]);
    }

    #[test]
    fn test_invalid_levels_are_still_loaded() {
        let levels = parse_levels("; 1\n\n####\n# .#\n#@@  #\n####\n");
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].lines.len(), 4);
    }

    #[test]
    fn test_read_levels_no_file() {
        let result = read_levels(Path::new("nonexistent_file.xsb"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
