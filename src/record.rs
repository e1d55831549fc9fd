use anyhow::{Context, Result};
use std::io::Write;
use std::str::FromStr;

/// Header line written in front of exported datasets.
pub const DATASET_HEADER: &str =
    "name,surname,email,birth_year,birth_month,birth_day,group,rating,phone";

/// Number of comma separated fields a data row must carry.
pub const FIELD_COUNT: usize = 9;

/// One student row.
#[derive(Clone, Debug, PartialEq)]
pub struct Student {
    pub name: String,
    pub surname: String,
    /// Unique identifier, used as the index key.
    pub email: String,
    pub birth_year: i32,
    pub birth_month: i32,
    pub birth_day: i32,
    pub group: String,
    pub rating: f32,
    pub phone: String,
}

fn parse_field<T>(raw: &str, field: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("invalid {field} value {raw:?}"))
}

impl Student {
    /// Parses one data line.
    ///
    /// Trailing empty fields do not count. Returns `Ok(None)` for rows with
    /// fewer than [`FIELD_COUNT`] remaining fields so the caller can skip them.
    /// Rows with enough fields must parse every numeric column; a failure is
    /// returned as an error.
    pub fn parse_line(line: &str) -> Result<Option<Self>> {
        let mut s: Vec<&str> = line.split(',').collect();
        while s.last() == Some(&"") {
            s.pop();
        }
        if s.len() < FIELD_COUNT {
            return Ok(None);
        }
        Ok(Some(Self {
            name: s[0].to_owned(),
            surname: s[1].to_owned(),
            email: s[2].to_owned(),
            birth_year: parse_field(s[3], "birth_year")?,
            birth_month: parse_field(s[4], "birth_month")?,
            birth_day: parse_field(s[5], "birth_day")?,
            group: s[6].to_owned(),
            rating: parse_field(s[7], "rating")?,
            phone: s[8].to_owned(),
        }))
    }

    /// Birth date folded into `month * 100 + day`.
    #[inline]
    pub fn birth_key(&self) -> i32 {
        self.birth_month * 100 + self.birth_day
    }

    #[inline]
    pub fn birth_month_day(&self) -> (i32, i32) {
        (self.birth_month, self.birth_day)
    }

    pub fn write_csv<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(
            w,
            "{},{},{},{},{},{},{},{:.2},{}",
            self.name,
            self.surname,
            self.email,
            self.birth_year,
            self.birth_month,
            self.birth_day,
            self.group,
            self.rating,
            self.phone
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = "Ann,Lee,ann@uni.edu,2003,4,17,KN-21,87.5,+380501112233";

    #[test]
    fn parses_full_row() {
        let st = Student::parse_line(ROW).unwrap().unwrap();
        assert_eq!(st.email, "ann@uni.edu");
        assert_eq!(st.birth_month_day(), (4, 17));
        assert_eq!(st.birth_key(), 417);
        assert_eq!(st.group, "KN-21");
        assert_eq!(st.rating, 87.5);
        assert_eq!(st.phone, "+380501112233");
    }

    #[test]
    fn short_row_is_skipped() {
        assert!(Student::parse_line("Ann,Lee,ann@uni.edu,2003")
            .unwrap()
            .is_none());
        assert!(Student::parse_line("").unwrap().is_none());
    }

    #[test]
    fn trailing_empty_fields_do_not_count() {
        assert!(Student::parse_line("A,B,a@x,2000,1,1,G,50.0,")
            .unwrap()
            .is_none());
        assert!(Student::parse_line("C,D,c@x,2000,1,1,G,,")
            .unwrap()
            .is_none());
        let st = Student::parse_line(&format!("{ROW},,")).unwrap().unwrap();
        assert_eq!(st.phone, "+380501112233");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let line = format!("{ROW},trailing");
        let st = Student::parse_line(&line).unwrap().unwrap();
        assert_eq!(st.phone, "+380501112233");
    }

    #[test]
    fn bad_number_is_an_error() {
        let err = Student::parse_line("Ann,Lee,ann@uni.edu,2003,April,17,KN-21,87.5,0")
            .unwrap_err();
        assert!(format!("{err:#}").contains("birth_month"), "{err:#}");
        assert!(Student::parse_line("Ann,Lee,a@b,2003,4,17,KN-21,high,0").is_err());
    }

    #[test]
    fn csv_line_reparses() {
        let st = Student::parse_line(ROW).unwrap().unwrap();
        let mut buf = Vec::new();
        st.write_csv(&mut buf).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert_eq!(line, "Ann,Lee,ann@uni.edu,2003,4,17,KN-21,87.50,+380501112233\n");
        assert_eq!(Student::parse_line(line.trim_end()).unwrap().unwrap(), st);
    }
}
