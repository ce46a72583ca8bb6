use colored::Colorize;

#[derive(Default, Debug, Clone, Eq, serde::Serialize)]
pub struct Span {
    pub start: (usize, usize),
    pub end: (usize, usize),
    pub source: String,
}

impl Span {
    /// Render this span against its source text with `msg` attached at the
    /// end, in the usual "context line, offending line, squiggle" layout.
    pub fn to_string(&self, msg: impl ToString) -> String {
        let Span { start, end, source } = self;
        let lines = source.lines().collect::<Vec<_>>();
        let line = start.0;
        let prev_line = if line > 0 {
            lines.get(line - 1).copied().unwrap_or("")
        } else {
            ""
        };
        let line_str = lines.get(line).copied().unwrap_or("");

        // margin _before_ left border
        let left_margin = format!("{}", end.0).len();
        let left_margin_fill = vec![' '; left_margin].iter().collect::<String>();

        let split_at = start.1.min(line_str.len());
        let (left, right) = line_str.split_at(split_at);

        let (left, right) = if start.0 != end.0 {
            // the error ranges over more than a single line, so the rest of
            // the first line is part of it
            (left.to_string(), right.to_string().red().to_string())
        } else {
            let err_len = (end.1 - start.1).min(right.len());
            let (err_str, after_err) = right.split_at(err_len);

            (
                left.to_string(),
                format!("{err_str}{after_err}", err_str = err_str.to_string().red()),
            )
        };

        let line_str = format!("{left}{right}");

        // padding between border and squiggles
        let left_padding_fill = vec![' '; end.1.max(1) - 1].iter().collect::<String>();

        let mut error_string = format!(
            "{left_margin_fill} |\n{left_margin_fill} |{prev_line} \n{line} |{line_str}",
            line = line + 1
        );

        ((start.0 + 1)..(end.0 + 1)).for_each(|line_number| {
            error_string = format!(
                "{error_string}\n{left_margin_fill} |{}",
                lines.get(line_number).copied().unwrap_or("").red()
            );
        });

        error_string = format!(
            "{error_string}\n{} |{left_padding_fill}^--- {}\n{left_margin_fill} |",
            end.0 + 2,
            msg.to_string()
        );

        error_string
    }

    pub fn merge(&self, other: &Span) -> Span {
        let Span { start, source, .. } = self.clone();
        let Span { end, .. } = other.clone();

        Span { start, end, source }
    }
}

impl PartialEq<Span> for Span {
    fn eq(&self, _other: &Span) -> bool {
        // spans never take part in semantic comparisons
        true
    }
}
