//! The editable draft: text plus a byte-offset cursor.

/// Text being composed, with the cursor kept on a char boundary.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Draft {
    text: String,
    pos: usize,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.pos
    }

    pub(super) fn set_cursor(&mut self, pos: usize) {
        if self.text.is_char_boundary(pos) {
            self.pos = pos;
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Replace the whole draft, cursor at the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.pos = self.text.len();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.pos, s);
        self.pos += s.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.pos, c);
        self.pos += c.len_utf8();
    }

    pub fn backspace(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        let prev = prev_char_boundary(&self.text, self.pos);
        self.text.drain(prev..self.pos);
        self.pos = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.pos >= self.text.len() {
            return false;
        }
        let next = next_char_boundary(&self.text, self.pos);
        self.text.drain(self.pos..next);
        true
    }

    fn move_to(&mut self, pos: usize) -> bool {
        let moved = pos != self.pos;
        self.pos = pos;
        moved
    }

    pub fn left(&mut self) -> bool {
        self.move_to(prev_char_boundary(&self.text, self.pos))
    }

    pub fn right(&mut self) -> bool {
        self.move_to(next_char_boundary(&self.text, self.pos))
    }

    pub fn word_left(&mut self) -> bool {
        self.move_to(prev_word_boundary(&self.text, self.pos))
    }

    pub fn word_right(&mut self) -> bool {
        self.move_to(next_word_boundary(&self.text, self.pos))
    }

    /// Start of the current logical line.
    pub fn home(&mut self) -> bool {
        let start = self.text[..self.pos].rfind('\n').map_or(0, |i| i + 1);
        self.move_to(start)
    }

    /// End of the current logical line.
    pub fn end(&mut self) -> bool {
        let end = self.text[self.pos..]
            .find('\n')
            .map_or(self.text.len(), |i| self.pos + i);
        self.move_to(end)
    }

    /// Empty the draft, returning its trimmed text if it had any.
    pub fn take_trimmed(&mut self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        let text = std::mem::take(&mut self.text);
        self.pos = 0;
        Some(text.trim().to_string())
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// readline `backward-word`: skip separators, then the word before them.
fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let before = &text[..pos];
    let word_end = before
        .char_indices()
        .rev()
        .find(|&(_, c)| is_word_char(c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    before[..word_end]
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// readline `forward-word`: skip separators, then the word after them.
fn next_word_boundary(text: &str, pos: usize) -> usize {
    let after = &text[pos..];
    let word_start = after
        .char_indices()
        .find(|&(_, c)| is_word_char(c))
        .map_or(after.len(), |(i, _)| i);
    after[word_start..]
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(text.len(), |(i, _)| pos + word_start + i)
}
