//! Insert a small sample catalog.
//!
//! Every insert is `ON CONFLICT DO NOTHING` on a unique natural key, so
//! running the command again leaves existing rows untouched.

use super::{CommandError, connect};

const AUTHORS: &[&str] = &[
    "Andrea Hirata",
    "Pramoedya Ananta Toer",
    "Tere Liye",
    "Dee Lestari",
];

/// `(name, description)`
const CATEGORIES: &[(&str, &str)] = &[
    ("Novel", "Fiksi panjang berbahasa Indonesia"),
    ("Sejarah", "Fiksi sejarah dan kisah masa kolonial"),
    ("Fiksi Ilmiah", "Cerita berlatar sains dan masa depan"),
];

const PUBLISHERS: &[&str] = &["Bentang Pustaka", "Lentera Dipantara", "Gramedia Pustaka Utama"];

/// A sample book referencing its author, category and publisher by name.
struct SeedBook {
    title: &'static str,
    isbn: &'static str,
    author: &'static str,
    category: &'static str,
    publisher: &'static str,
    price: &'static str,
    year: i32,
}

const BOOKS: &[SeedBook] = &[
    SeedBook {
        title: "Laskar Pelangi",
        isbn: "9789793062792",
        author: "Andrea Hirata",
        category: "Novel",
        publisher: "Bentang Pustaka",
        price: "89000.00",
        year: 2005,
    },
    SeedBook {
        title: "Sang Pemimpi",
        isbn: "9789793062921",
        author: "Andrea Hirata",
        category: "Novel",
        publisher: "Bentang Pustaka",
        price: "79000.00",
        year: 2006,
    },
    SeedBook {
        title: "Bumi Manusia",
        isbn: "9789799731234",
        author: "Pramoedya Ananta Toer",
        category: "Sejarah",
        publisher: "Lentera Dipantara",
        price: "135000.00",
        year: 1980,
    },
    SeedBook {
        title: "Hujan",
        isbn: "9786020324784",
        author: "Tere Liye",
        category: "Fiksi Ilmiah",
        publisher: "Gramedia Pustaka Utama",
        price: "98000.00",
        year: 2016,
    },
    SeedBook {
        title: "Supernova: Ksatria, Puteri, dan Bintang Jatuh",
        isbn: "9786022911234",
        author: "Dee Lestari",
        category: "Fiksi Ilmiah",
        publisher: "Bentang Pustaka",
        price: "92000.00",
        year: 2001,
    },
];

/// Seed the catalog in a single transaction.
///
/// # Errors
///
/// Returns an error if configuration is missing or any insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    let mut tx = pool.begin().await?;

    for &name in AUTHORS {
        sqlx::query("INSERT INTO Author (name_author) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }

    for &(name, description) in CATEGORIES {
        sqlx::query(
            "INSERT INTO Category (name_category, description_category) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .execute(&mut *tx)
        .await?;
    }

    for &name in PUBLISHERS {
        sqlx::query("INSERT INTO Publisher (name_publisher) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }

    let mut inserted = 0;
    for book in BOOKS {
        let result = sqlx::query(
            r"
            INSERT INTO Book (title, isbn, author_id, category_id, publisher_id, price, publication_year)
            SELECT $1, $2, a.author_id, c.category_id, p.publisher_id, $6::NUMERIC, $7
            FROM Author a, Category c, Publisher p
            WHERE a.name_author = $3 AND c.name_category = $4 AND p.name_publisher = $5
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(book.title)
        .bind(book.isbn)
        .bind(book.author)
        .bind(book.category)
        .bind(book.publisher)
        .bind(book.price)
        .bind(book.year)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    tracing::info!(inserted, total = BOOKS.len(), "Sample catalog seeded");

    pool.close().await;
    Ok(())
}
