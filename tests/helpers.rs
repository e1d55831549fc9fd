#![allow(dead_code)]
use std::fs;
use std::path::{Path, PathBuf};

use rosterbench::Student;

pub const HEADER: &str = "name,surname,email,birth_year,birth_month,birth_day,group,rating,phone";

pub fn student(email: &str, group: &str, rating: f32, month: i32, day: i32) -> Student {
    Student {
        name: "Name".into(),
        surname: "Surname".into(),
        email: email.into(),
        birth_year: 2001,
        birth_month: month,
        birth_day: day,
        group: group.into(),
        rating,
        phone: "+380000000000".into(),
    }
}

/// `n` well formed dataset lines, without header.
pub fn rows(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format!(
                "Name{i},Surname{i},student{i}@uni.edu,{},{},{},KN-{},{}.5,+38050{i:07}",
                1995 + i % 10,
                i % 12 + 1,
                i % 28 + 1,
                i % 5,
                i % 100
            )
        })
        .collect()
}

pub fn write_master(dir: &Path, n: usize) -> PathBuf {
    let path = dir.join("students.csv");
    let mut text = String::from(HEADER);
    text.push('\n');
    for line in rows(n) {
        text.push_str(&line);
        text.push('\n');
    }
    fs::write(&path, text).expect("write master dataset");
    path
}
