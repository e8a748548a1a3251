//! Test Helpers

use crate::{
    domain::products::{
        ProductsServiceError,
        models::{NewProduct, ProductId},
    },
    test::TestContext,
};

pub(crate) fn new_product(title: &str, price: u64, stock: u32) -> NewProduct {
    NewProduct {
        uuid: ProductId::new(),
        title: title.to_string(),
        description: format!("{title} description"),
        price,
        image: "placeholder.webp".to_string(),
        stock,
        category: "general".to_string(),
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    title: &str,
    price: u64,
    stock: u32,
) -> Result<ProductId, ProductsServiceError> {
    let product = ctx
        .products
        .create_product(ctx.admin, new_product(title, price, stock))
        .await?;

    Ok(product.uuid)
}
