//! GraphQL documents sent to the Storefront API.

/// Legacy checkout with one line item.
pub const CHECKOUT_CREATE_LINES: &str = r#"
mutation($lines: [CheckoutLineItemInput!]!) {
  checkoutCreate(input: { lineItems: $lines }) {
    checkout { id webUrl }
    checkoutUserErrors { field message }
  }
}"#;

/// Cart with one line.
pub const CART_CREATE: &str = r#"
mutation($lines: [CartLineInput!]!) {
  cartCreate(input: { lines: $lines }) {
    cart { id checkoutUrl }
    userErrors { field message }
  }
}"#;

/// First variant of a product, for handle resolution.
pub const PRODUCT_FIRST_VARIANT: &str = r#"
query($handle: String!) {
  product(handle: $handle) {
    variants(first: 1) { edges { node { id } } }
  }
}"#;

/// Full product with up to ten variants.
pub const GET_PRODUCT: &str = r#"
query getProduct($handle: String!) {
  product(handle: $handle) {
    id
    handle
    title
    description
    priceRange { minVariantPrice { amount currencyCode } }
    variants(first: 10) {
      edges {
        node {
          id
          title
          price { amount currencyCode }
          availableForSale
        }
      }
    }
  }
}"#;

/// Checkout with line items, prices and totals.
pub const CHECKOUT_CREATE: &str = r#"
mutation checkoutCreate($input: CheckoutCreateInput!) {
  checkoutCreate(input: $input) {
    checkout {
      id
      webUrl
      lineItems(first: 5) {
        edges {
          node {
            id
            quantity
            variant { id title price { amount currencyCode } }
          }
        }
      }
      totalPrice { amount currencyCode }
    }
    checkoutUserErrors { field message }
  }
}"#;

pub const CHECKOUT_EMAIL_UPDATE: &str = r#"
mutation checkoutEmailUpdateV2($checkoutId: ID!, $email: String!) {
  checkoutEmailUpdateV2(checkoutId: $checkoutId, email: $email) {
    checkout { id email webUrl }
    checkoutUserErrors { field message }
  }
}"#;

pub const CHECKOUT_ATTRIBUTES_UPDATE: &str = r#"
mutation checkoutAttributesUpdateV2($checkoutId: ID!, $input: CheckoutAttributesUpdateV2Input!) {
  checkoutAttributesUpdateV2(checkoutId: $checkoutId, input: $input) {
    checkout { id customAttributes { key value } }
    checkoutUserErrors { field message }
  }
}"#;
